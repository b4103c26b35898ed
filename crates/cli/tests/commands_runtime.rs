use std::env;
use std::sync::{Mutex, OnceLock};

use procsight_cli::commands::{config, doctor};
use serde_json::Value;

#[test]
fn doctor_reports_missing_credentials_as_failures() {
    with_env(&[], || {
        let output = doctor::run(true);
        let payload = parse_payload(&output);

        assert_eq!(payload["overall_status"], "fail");

        let checks = payload["checks"].as_array().expect("checks array");
        let llm = find_check(checks, "llm_credential");
        assert_eq!(llm["status"], "fail");
        let speech = find_check(checks, "speech_credential");
        assert_eq!(speech["status"], "fail");
        let config_check = find_check(checks, "config_validation");
        assert_eq!(config_check["status"], "pass");
    });
}

#[test]
fn doctor_passes_when_credentials_and_output_dir_are_ready() {
    let dir = tempdir();

    with_env(
        &[
            ("PROCSIGHT_LLM_API_KEY", "sk-or-test"),
            ("PROCSIGHT_SPEECH_API_KEY", "el-test"),
            ("PROCSIGHT_OUTPUT_DIR", dir.to_str().expect("utf-8 tempdir")),
        ],
        || {
            let output = doctor::run(true);
            let payload = parse_payload(&output);

            assert_eq!(payload["overall_status"], "pass");
            let checks = payload["checks"].as_array().expect("checks array");
            assert_eq!(find_check(checks, "output_dir_writable")["status"], "pass");
        },
    );
}

#[test]
fn doctor_skips_dependent_checks_when_config_is_invalid() {
    with_env(&[("PROCSIGHT_TELEMETRY_SOURCE", "remote")], || {
        let output = doctor::run(true);
        let payload = parse_payload(&output);

        assert_eq!(payload["overall_status"], "fail");
        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(find_check(checks, "config_validation")["status"], "fail");
        assert_eq!(find_check(checks, "llm_credential")["status"], "skipped");
    });
}

#[test]
fn config_output_redacts_secrets() {
    with_env(&[("PROCSIGHT_LLM_API_KEY", "sk-or-v1-super-secret")], || {
        let output = config::run();

        assert!(!output.contains("sk-or-v1-super-secret"));
        assert!(output.contains("llm.api_key = sk-o****"));
        assert!(output.contains("(env:PROCSIGHT_LLM_API_KEY)"));
    });
}

#[test]
fn config_reports_defaults_when_nothing_is_set() {
    with_env(&[], || {
        let output = config::run();

        assert!(output.contains("telemetry.source = fixture"));
        assert!(output.contains("llm.model = mistralai/mistral-7b-instruct"));
        assert!(output.contains("llm.api_key = <unset>"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn find_check<'a>(checks: &'a [Value], name: &str) -> &'a Value {
    checks
        .iter()
        .find(|check| check["name"] == name)
        .unwrap_or_else(|| panic!("missing check {name}"))
}

fn tempdir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("procsight-doctor-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("tempdir");
    dir
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PROCSIGHT_TELEMETRY_SOURCE",
        "PROCSIGHT_TELEMETRY_BASE_URL",
        "PROCSIGHT_TELEMETRY_API_TOKEN",
        "PROCSIGHT_TELEMETRY_TIMEOUT_SECS",
        "PROCSIGHT_LLM_API_KEY",
        "PROCSIGHT_LLM_BASE_URL",
        "PROCSIGHT_LLM_MODEL",
        "PROCSIGHT_LLM_TIMEOUT_SECS",
        "PROCSIGHT_LLM_TEMPERATURE",
        "PROCSIGHT_LLM_MAX_TOKENS",
        "PROCSIGHT_SPEECH_API_KEY",
        "PROCSIGHT_SPEECH_BASE_URL",
        "PROCSIGHT_SPEECH_VOICE_ID",
        "PROCSIGHT_SPEECH_MODEL_ID",
        "PROCSIGHT_SPEECH_OUTPUT_FORMAT",
        "PROCSIGHT_SPEECH_TIMEOUT_SECS",
        "PROCSIGHT_OUTPUT_DIR",
        "PROCSIGHT_SERVER_BIND_ADDRESS",
        "PROCSIGHT_SERVER_PORT",
        "PROCSIGHT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "PROCSIGHT_LOGGING_LEVEL",
        "PROCSIGHT_LOGGING_FORMAT",
        "PROCSIGHT_LOG_LEVEL",
        "PROCSIGHT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
