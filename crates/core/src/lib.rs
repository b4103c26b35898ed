pub mod config;
pub mod context;
pub mod contract;
pub mod domain;
pub mod errors;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use context::build_context;
pub use contract::parse_analysis;
pub use domain::analysis::{AgentRunResult, AnalysisResult};
pub use domain::telemetry::{Bottleneck, TelemetryRecord, VariantShare};
pub use errors::PipelineError;
