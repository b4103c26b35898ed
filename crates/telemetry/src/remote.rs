//! Process-mining workspace API client for real deployments.

use std::time::Duration;

use async_trait::async_trait;
use procsight_core::config::TelemetryConfig;
use procsight_core::{PipelineError, TelemetryRecord};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::source::TelemetrySource;

/// Fetches a telemetry snapshot from a remote workspace API.
///
/// Expects `GET {base_url}/v1/insights?q=<query>` to return a JSON body in
/// [`TelemetryRecord`] shape; partial payloads are tolerated by the record's
/// serde defaults. Every failure mode surfaces as `DataSource` so callers
/// see one kind for "the telemetry fetch failed".
pub struct RemoteSource {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl RemoteSource {
    pub fn new(config: &TelemetryConfig) -> Result<Self, PipelineError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "telemetry.base_url is required for the remote source".to_string(),
                )
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| {
                PipelineError::Configuration(format!("could not build telemetry client: {err}"))
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl TelemetrySource for RemoteSource {
    async fn fetch(&self, query: &str) -> Result<TelemetryRecord, PipelineError> {
        let url = format!("{}/v1/insights", self.base_url);

        let mut request = self.http.get(&url).query(&[("q", query)]);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|err| {
            PipelineError::DataSource(format!("request to {url} failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::DataSource(format!(
                "{url} returned status {status}: {body}"
            )));
        }

        let record: TelemetryRecord = response.json().await.map_err(|err| {
            PipelineError::DataSource(format!("{url} returned a malformed snapshot: {err}"))
        })?;

        info!(
            event_name = "telemetry.remote.fetched",
            process = %record.process,
            kpi_count = record.kpis.len(),
            bottleneck_count = record.bottleneck_examples.len(),
            "telemetry snapshot fetched"
        );

        Ok(record)
    }
}
