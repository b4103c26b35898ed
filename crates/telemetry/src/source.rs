use async_trait::async_trait;
use procsight_core::{PipelineError, TelemetryRecord};

/// A process-mining data source.
///
/// `query` is the caller's free-text question; a source may use it to scope
/// the snapshot or ignore it entirely (the fixture source does).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<TelemetryRecord, PipelineError>;
}
