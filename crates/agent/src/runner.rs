//! One full agent run: mandatory analysis plus optional rendering.

use std::sync::Arc;

use procsight_core::config::{AppConfig, TelemetrySourceKind};
use procsight_core::{AgentRunResult, PipelineError};
use procsight_render::{DeckRenderer, DeckSpec, ElevenLabsSynthesizer, SpeechSynthesizer, TeraDeckRenderer};
use procsight_telemetry::{FixtureSource, RemoteSource, TelemetrySource};
use tracing::info;
use uuid::Uuid;

use crate::llm::OpenRouterClient;
use crate::pipeline::AnalysisPipeline;

/// Composes the orchestrator with the two rendering collaborators.
///
/// The analysis step is mandatory: its failure is the run's failure and no
/// rendering step starts after it fails. The rendering steps are optional
/// and sequential; a failure in either aborts the remainder of the run
/// rather than degrading to a partial result.
pub struct AgentRunner {
    pipeline: Arc<AnalysisPipeline>,
    deck: Arc<dyn DeckRenderer>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl AgentRunner {
    pub fn new(
        pipeline: Arc<AnalysisPipeline>,
        deck: Arc<dyn DeckRenderer>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self { pipeline, deck, speech }
    }

    /// Wire up the production collaborators from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let source: Arc<dyn TelemetrySource> = match config.telemetry.source {
            TelemetrySourceKind::Fixture => Arc::new(FixtureSource::new()),
            TelemetrySourceKind::Remote => Arc::new(RemoteSource::new(&config.telemetry)?),
        };

        let chat = Arc::new(OpenRouterClient::new(config.llm.clone())?);
        let pipeline = Arc::new(AnalysisPipeline::new(source, chat));

        let deck = Arc::new(TeraDeckRenderer::new(&config.output.dir)?);
        let speech =
            Arc::new(ElevenLabsSynthesizer::new(config.speech.clone(), &config.output.dir)?);

        Ok(Self::new(pipeline, deck, speech))
    }

    pub fn pipeline(&self) -> Arc<AnalysisPipeline> {
        self.pipeline.clone()
    }

    pub fn deck(&self) -> Arc<dyn DeckRenderer> {
        self.deck.clone()
    }

    pub fn speech(&self) -> Arc<dyn SpeechSynthesizer> {
        self.speech.clone()
    }

    pub async fn run(
        &self,
        query: &str,
        make_slides: bool,
        narrate: bool,
    ) -> Result<AgentRunResult, PipelineError> {
        let (record, analysis) = self.pipeline.analyze(query).await?;

        // Run-scoped id keeps concurrent runs from overwriting each
        // other's artifacts under fixed names.
        let run_id = short_run_id();

        let mut result = AgentRunResult {
            kpis: record.kpis.clone(),
            summary: analysis.summary,
            bullets: analysis.bullets,
            actions: analysis.actions,
            narration: analysis.narration,
            ppt_path: None,
            audio_path: None,
        };

        if make_slides {
            let mut lines = result.bullets.clone();
            lines.extend(result.actions.iter().cloned());

            let deck = DeckSpec {
                title: format!("{} Weekly Bottlenecks", record.process),
                summary: result.summary.clone(),
                lines,
                kpis: record.kpis.clone(),
                filename: format!("process_bottlenecks-{run_id}.html"),
            };

            let path = self.deck.render_deck(&deck).await?;
            result.ppt_path = Some(path.display().to_string());
        }

        if narrate && !result.narration.is_empty() {
            let path = self
                .speech
                .synthesize(&result.narration, &format!("narration-{run_id}.mp3"))
                .await?;
            result.audio_path = Some(path.display().to_string());
        }

        info!(
            event_name = "agent.run.completed",
            run_id = %run_id,
            deck_rendered = result.ppt_path.is_some(),
            narration_rendered = result.audio_path.is_some(),
            "agent run completed"
        );

        Ok(result)
    }
}

fn short_run_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}
