use std::env;

use procsight_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "telemetry.source",
        &format!("{:?}", config.telemetry.source).to_ascii_lowercase(),
        Some("PROCSIGHT_TELEMETRY_SOURCE"),
    ));
    lines.push(render_line(
        "telemetry.base_url",
        config.telemetry.base_url.as_deref().unwrap_or("<unset>"),
        Some("PROCSIGHT_TELEMETRY_BASE_URL"),
    ));
    lines.push(render_line(
        "telemetry.api_token",
        &redact_optional(config.telemetry.api_token.as_ref().map(|token| token.expose_secret())),
        Some("PROCSIGHT_TELEMETRY_API_TOKEN"),
    ));

    lines.push(render_line(
        "llm.api_key",
        &redact_optional(config.llm.api_key.as_ref().map(|key| key.expose_secret())),
        Some("PROCSIGHT_LLM_API_KEY"),
    ));
    lines.push(render_line("llm.base_url", &config.llm.base_url, Some("PROCSIGHT_LLM_BASE_URL")));
    lines.push(render_line("llm.model", &config.llm.model, Some("PROCSIGHT_LLM_MODEL")));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        Some("PROCSIGHT_LLM_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "speech.api_key",
        &redact_optional(config.speech.api_key.as_ref().map(|key| key.expose_secret())),
        Some("PROCSIGHT_SPEECH_API_KEY"),
    ));
    lines.push(render_line(
        "speech.voice_id",
        &config.speech.voice_id,
        Some("PROCSIGHT_SPEECH_VOICE_ID"),
    ));

    lines.push(render_line(
        "output.dir",
        &config.output.dir.display().to_string(),
        Some("PROCSIGHT_OUTPUT_DIR"),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        Some("PROCSIGHT_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        Some("PROCSIGHT_SERVER_PORT"),
    ));

    lines.push(render_line("logging.level", &config.logging.level, Some("PROCSIGHT_LOGGING_LEVEL")));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, env_var: Option<&str>) -> String {
    let source = env_var
        .filter(|var| env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false))
        .map(|var| format!("env:{var}"))
        .unwrap_or_else(|| "file|default".to_string());

    format!("  {key} = {value}  ({source})")
}

fn redact_optional(secret: Option<&str>) -> String {
    match secret {
        None => "<unset>".to_string(),
        Some(value) if value.trim().is_empty() => "<unset>".to_string(),
        Some(value) => {
            let visible: String = value.chars().take(4).collect();
            format!("{visible}****")
        }
    }
}
