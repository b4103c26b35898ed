use std::sync::Arc;

use anyhow::Context;
use procsight_agent::AgentRunner;
use procsight_core::config::AppConfig;

use crate::api::AppState;

/// Wire the production collaborators into the shared request state.
pub fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let runner =
        AgentRunner::from_config(config).context("failed to construct the agent runner")?;

    Ok(AppState { runner: Arc::new(runner), output_dir: config.output.dir.clone() })
}
