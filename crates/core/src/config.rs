use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub llm: LlmConfig,
    pub speech: SpeechConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub source: TelemetrySourceKind,
    pub base_url: Option<String>,
    pub api_token: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Absent keys are allowed at load time; the client reports a
    /// configuration error at call time, before any network attempt.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct SpeechConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct OutputConfig {
    /// Directory rendered artifacts (decks, narration audio) are written to.
    pub dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetrySourceKind {
    Fixture,
    Remote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub llm_model: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub telemetry_source: Option<TelemetrySourceKind>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig {
                source: TelemetrySourceKind::Fixture,
                base_url: None,
                api_token: None,
                timeout_secs: 30,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
                model: "mistralai/mistral-7b-instruct".to_string(),
                timeout_secs: 60,
                temperature: 0.2,
                max_tokens: 1200,
            },
            speech: SpeechConfig {
                api_key: None,
                base_url: "https://api.elevenlabs.io".to_string(),
                voice_id: "FTNCalFNG5bRnkkaP5Ug".to_string(),
                model_id: "eleven_multilingual_v2".to_string(),
                output_format: "mp3_44100_128".to_string(),
                timeout_secs: 60,
            },
            output: OutputConfig { dir: PathBuf::from("./outputs") },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for TelemetrySourceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(Self::Fixture),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::Validation(format!(
                "unsupported telemetry source `{other}` (expected fixture|remote)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("procsight.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(telemetry) = patch.telemetry {
            if let Some(source) = telemetry.source {
                self.telemetry.source = source;
            }
            if let Some(base_url) = telemetry.base_url {
                self.telemetry.base_url = Some(base_url);
            }
            if let Some(api_token_value) = telemetry.api_token {
                self.telemetry.api_token = Some(secret_value(api_token_value));
            }
            if let Some(timeout_secs) = telemetry.timeout_secs {
                self.telemetry.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm.max_tokens = max_tokens;
            }
        }

        if let Some(speech) = patch.speech {
            if let Some(api_key_value) = speech.api_key {
                self.speech.api_key = Some(secret_value(api_key_value));
            }
            if let Some(base_url) = speech.base_url {
                self.speech.base_url = base_url;
            }
            if let Some(voice_id) = speech.voice_id {
                self.speech.voice_id = voice_id;
            }
            if let Some(model_id) = speech.model_id {
                self.speech.model_id = model_id;
            }
            if let Some(output_format) = speech.output_format {
                self.speech.output_format = output_format;
            }
            if let Some(timeout_secs) = speech.timeout_secs {
                self.speech.timeout_secs = timeout_secs;
            }
        }

        if let Some(output) = patch.output {
            if let Some(dir) = output.dir {
                self.output.dir = PathBuf::from(dir);
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PROCSIGHT_TELEMETRY_SOURCE") {
            self.telemetry.source = value.parse()?;
        }
        if let Some(value) = read_env("PROCSIGHT_TELEMETRY_BASE_URL") {
            self.telemetry.base_url = Some(value);
        }
        if let Some(value) = read_env("PROCSIGHT_TELEMETRY_API_TOKEN") {
            self.telemetry.api_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("PROCSIGHT_TELEMETRY_TIMEOUT_SECS") {
            self.telemetry.timeout_secs = parse_u64("PROCSIGHT_TELEMETRY_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PROCSIGHT_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PROCSIGHT_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("PROCSIGHT_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("PROCSIGHT_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("PROCSIGHT_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PROCSIGHT_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("PROCSIGHT_LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = read_env("PROCSIGHT_LLM_MAX_TOKENS") {
            self.llm.max_tokens = parse_u32("PROCSIGHT_LLM_MAX_TOKENS", &value)?;
        }

        if let Some(value) = read_env("PROCSIGHT_SPEECH_API_KEY") {
            self.speech.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PROCSIGHT_SPEECH_BASE_URL") {
            self.speech.base_url = value;
        }
        if let Some(value) = read_env("PROCSIGHT_SPEECH_VOICE_ID") {
            self.speech.voice_id = value;
        }
        if let Some(value) = read_env("PROCSIGHT_SPEECH_MODEL_ID") {
            self.speech.model_id = value;
        }
        if let Some(value) = read_env("PROCSIGHT_SPEECH_OUTPUT_FORMAT") {
            self.speech.output_format = value;
        }
        if let Some(value) = read_env("PROCSIGHT_SPEECH_TIMEOUT_SECS") {
            self.speech.timeout_secs = parse_u64("PROCSIGHT_SPEECH_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PROCSIGHT_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(value);
        }

        if let Some(value) = read_env("PROCSIGHT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("PROCSIGHT_SERVER_PORT") {
            self.server.port = parse_u16("PROCSIGHT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("PROCSIGHT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("PROCSIGHT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("PROCSIGHT_LOGGING_LEVEL").or_else(|| read_env("PROCSIGHT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PROCSIGHT_LOGGING_FORMAT").or_else(|| read_env("PROCSIGHT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output.dir = output_dir;
        }
        if let Some(telemetry_source) = overrides.telemetry_source {
            self.telemetry.source = telemetry_source;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_telemetry(&self.telemetry)?;
        validate_llm(&self.llm)?;
        validate_speech(&self.speech)?;
        validate_output(&self.output)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("procsight.toml"), PathBuf::from("config/procsight.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_telemetry(telemetry: &TelemetryConfig) -> Result<(), ConfigError> {
    if telemetry.timeout_secs == 0 || telemetry.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "telemetry.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if telemetry.source == TelemetrySourceKind::Remote {
        let base_url = telemetry.base_url.as_deref().unwrap_or("").trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "telemetry.base_url is required when telemetry.source is `remote`".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "telemetry.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if llm.base_url.trim().is_empty() {
        return Err(ConfigError::Validation("llm.base_url must not be empty".to_string()));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if llm.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "llm.max_tokens must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_speech(speech: &SpeechConfig) -> Result<(), ConfigError> {
    if speech.timeout_secs == 0 || speech.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "speech.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if speech.base_url.trim().is_empty() {
        return Err(ConfigError::Validation("speech.base_url must not be empty".to_string()));
    }

    if speech.voice_id.trim().is_empty() {
        return Err(ConfigError::Validation("speech.voice_id must not be empty".to_string()));
    }

    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("output.dir must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    telemetry: Option<TelemetryPatch>,
    llm: Option<LlmPatch>,
    speech: Option<SpeechPatch>,
    output: Option<OutputPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct TelemetryPatch {
    source: Option<TelemetrySourceKind>,
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SpeechPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    voice_id: Option<String>,
    model_id: Option<String>,
    output_format: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputPatch {
    dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, TelemetrySourceKind,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_credentials() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.llm.api_key.is_none(), "llm key should be absent by default")?;
        ensure(config.speech.api_key.is_none(), "speech key should be absent by default")?;
        ensure(
            config.telemetry.source == TelemetrySourceKind::Fixture,
            "default telemetry source should be the fixture dataset",
        )?;
        ensure(config.llm.timeout_secs == 60, "default llm timeout should be 60 seconds")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_OPENROUTER_KEY", "sk-or-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("procsight.toml");
            fs::write(
                &path,
                r#"
[llm]
api_key = "${TEST_OPENROUTER_KEY}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let api_key = config.llm.api_key.ok_or("llm key should be set")?;
            ensure(
                api_key.expose_secret() == "sk-or-from-env",
                "llm key should be interpolated from the environment",
            )
        })();

        clear_vars(&["TEST_OPENROUTER_KEY"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCSIGHT_LLM_MODEL", "env/model");
        env::set_var("PROCSIGHT_OUTPUT_DIR", "./env-outputs");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("procsight.toml");
            fs::write(
                &path,
                r#"
[llm]
model = "file/model"

[output]
dir = "./file-outputs"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    llm_model: Some("override/model".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.model == "override/model", "programmatic model override should win")?;
            ensure(config.logging.level == "debug", "programmatic log level should win")?;
            ensure(
                config.output.dir.to_string_lossy() == "./env-outputs",
                "env output dir should win over the file value",
            )
        })();

        clear_vars(&["PROCSIGHT_LLM_MODEL", "PROCSIGHT_OUTPUT_DIR"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCSIGHT_LOG_LEVEL", "warn");
        env::set_var("PROCSIGHT_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warn log level should come from alias var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty format should come from alias var",
            )
        })();

        clear_vars(&["PROCSIGHT_LOG_LEVEL", "PROCSIGHT_LOG_FORMAT"]);
        result
    }

    #[test]
    fn remote_telemetry_requires_base_url() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCSIGHT_TELEMETRY_SOURCE", "remote");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("telemetry.base_url")
            );
            ensure(has_message, "validation failure should mention telemetry.base_url")
        })();

        clear_vars(&["PROCSIGHT_TELEMETRY_SOURCE"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCSIGHT_LLM_API_KEY", "sk-or-secret-value");
        env::set_var("PROCSIGHT_SPEECH_API_KEY", "el-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-or-secret-value"), "debug should not leak the llm key")?;
            ensure(!debug.contains("el-secret-value"), "debug should not leak the speech key")
        })();

        clear_vars(&["PROCSIGHT_LLM_API_KEY", "PROCSIGHT_SPEECH_API_KEY"]);
        result
    }

    #[test]
    fn invalid_port_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCSIGHT_SERVER_PORT", "not-a-port");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected env override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "PROCSIGHT_SERVER_PORT"),
                "failure should name the offending variable",
            )
        })();

        clear_vars(&["PROCSIGHT_SERVER_PORT"]);
        result
    }
}
