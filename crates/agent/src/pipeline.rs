//! The analysis orchestrator: fetch → context → complete → parse.

use std::sync::Arc;

use procsight_core::{build_context, parse_analysis, AnalysisResult, PipelineError, TelemetryRecord};
use procsight_telemetry::TelemetrySource;
use tracing::info;

use crate::llm::ChatClient;
use crate::prompt;

/// Runs one analysis end to end.
///
/// The sequence is strictly linear and atomic-or-failed: any step's error
/// propagates unmodified and no partial analysis is ever returned.
pub struct AnalysisPipeline {
    source: Arc<dyn TelemetrySource>,
    chat: Arc<dyn ChatClient>,
    model: Option<String>,
}

impl AnalysisPipeline {
    pub fn new(source: Arc<dyn TelemetrySource>, chat: Arc<dyn ChatClient>) -> Self {
        Self { source, chat, model: None }
    }

    /// Override the configured model for this pipeline's completions.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub async fn analyze(
        &self,
        query: &str,
    ) -> Result<(TelemetryRecord, AnalysisResult), PipelineError> {
        let record = self.source.fetch(query).await?;
        let context = build_context(&record);

        info!(
            event_name = "agent.analysis.context_built",
            process = %record.process,
            prompt_version = prompt::PROMPT_VERSION,
            context_bytes = context.len(),
            "prompt context assembled"
        );

        let messages = prompt::analysis_messages(query, &context);
        let raw = self.chat.complete(&messages, self.model.as_deref()).await?;
        let analysis = parse_analysis(&raw)?;

        info!(
            event_name = "agent.analysis.completed",
            bullet_count = analysis.bullets.len(),
            action_count = analysis.actions.len(),
            narration_bytes = analysis.narration.len(),
            "analysis parsed"
        );

        Ok((record, analysis))
    }
}
