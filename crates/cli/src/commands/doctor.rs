use procsight_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm_credential(&config));
            checks.push(check_speech_credential(&config));
            checks.push(check_output_dir(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("llm_credential"));
            checks.push(skipped("speech_credential"));
            checks.push(skipped("output_dir_writable"));
        }
    }

    let overall_status = if checks.iter().any(|check| check.status == CheckStatus::Fail) {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };

    let summary = match overall_status {
        CheckStatus::Pass => "all readiness checks passed".to_string(),
        _ => "one or more readiness checks failed".to_string(),
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_credential(config: &AppConfig) -> DoctorCheck {
    let present = config
        .llm
        .api_key
        .as_ref()
        .map(|key| !key.expose_secret().trim().is_empty())
        .unwrap_or(false);

    if present {
        DoctorCheck {
            name: "llm_credential",
            status: CheckStatus::Pass,
            details: "llm.api_key is configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "llm_credential",
            status: CheckStatus::Fail,
            details: "llm.api_key is not configured; analyses will fail until PROCSIGHT_LLM_API_KEY or [llm].api_key is set".to_string(),
        }
    }
}

fn check_speech_credential(config: &AppConfig) -> DoctorCheck {
    let present = config
        .speech
        .api_key
        .as_ref()
        .map(|key| !key.expose_secret().trim().is_empty())
        .unwrap_or(false);

    if present {
        DoctorCheck {
            name: "speech_credential",
            status: CheckStatus::Pass,
            details: "speech.api_key is configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "speech_credential",
            status: CheckStatus::Fail,
            details: "speech.api_key is not configured; narration synthesis will fail until PROCSIGHT_SPEECH_API_KEY or [speech].api_key is set".to_string(),
        }
    }
}

fn check_output_dir(config: &AppConfig) -> DoctorCheck {
    match std::fs::create_dir_all(&config.output.dir) {
        Ok(()) => DoctorCheck {
            name: "output_dir_writable",
            status: CheckStatus::Pass,
            details: format!("artifact directory {} is writable", config.output.dir.display()),
        },
        Err(error) => DoctorCheck {
            name: "output_dir_writable",
            status: CheckStatus::Fail,
            details: format!(
                "artifact directory {} unavailable: {error}",
                config.output.dir.display()
            ),
        },
    }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration failed to load".to_string(),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![format!(
        "doctor: {} - {}",
        match report.overall_status {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skipped",
        },
        report.summary
    )];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("  [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
