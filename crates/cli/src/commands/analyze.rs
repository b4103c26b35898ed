use procsight_agent::AgentRunner;
use procsight_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use serde_json::json;

use crate::commands::CommandResult;

pub fn run(query: &str, model: Option<&str>) -> CommandResult {
    let options = LoadOptions {
        overrides: ConfigOverrides {
            llm_model: model.map(str::to_string),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    };

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("analyze", "config_validation", error.to_string(), 2)
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("analyze", "runtime", error.to_string(), 3),
    };

    let outcome = runtime.block_on(async {
        let runner = AgentRunner::from_config(&config)?;
        runner.pipeline().analyze(query).await
    });

    match outcome {
        Ok((raw, analysis)) => {
            let payload = json!({ "raw": raw, "analysis": analysis });
            let rendered = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
            CommandResult { exit_code: 0, output: rendered }
        }
        Err(error) => CommandResult::failure("analyze", error.kind(), error.to_string(), 4),
    }
}
