//! Telemetry acquisition for the analysis pipeline.
//!
//! Every pipeline run starts with one `TelemetrySource::fetch` call that
//! produces a fresh, immutable [`procsight_core::TelemetryRecord`]. Two
//! sources ship with the service:
//!
//! - [`FixtureSource`] - the deterministic Procure-to-Pay demo dataset,
//!   total for any query.
//! - [`RemoteSource`] - a process-mining workspace API client for real
//!   deployments; its failures surface as `PipelineError::DataSource`.

pub mod fixtures;
pub mod remote;
pub mod source;

pub use fixtures::FixtureSource;
pub use remote::RemoteSource;
pub use source::TelemetrySource;
