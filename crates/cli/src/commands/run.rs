use procsight_agent::AgentRunner;
use procsight_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

pub fn run(query: &str, make_slides: bool, narrate: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("run", "config_validation", error.to_string(), 2)
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("run", "runtime", error.to_string(), 3),
    };

    let outcome = runtime.block_on(async {
        let runner = AgentRunner::from_config(&config)?;
        runner.run(query, make_slides, narrate).await
    });

    match outcome {
        Ok(result) => {
            let rendered = serde_json::to_string_pretty(&result)
                .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
            CommandResult { exit_code: 0, output: rendered }
        }
        Err(error) => CommandResult::failure("run", error.kind(), error.to_string(), 4),
    }
}
