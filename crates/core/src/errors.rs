use thiserror::Error;

/// Failure taxonomy for a single pipeline run.
///
/// No step recovers locally: the orchestrator and the agent runner surface
/// the first failure whole, and the transport layer translates it into a
/// structured non-2xx response.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PipelineError {
    /// A required credential or setting is missing. Raised before any
    /// network attempt is made.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Network-level failure reaching an upstream (timeout, connect).
    #[error("transport failure reaching {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
    /// Upstream was reachable but returned a failure status.
    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    /// Model output could not be interpreted as the required shape.
    #[error("analysis contract violation: {0}")]
    Contract(String),
    /// The telemetry source failed to produce a record.
    #[error("telemetry source failure: {0}")]
    DataSource(String),
    /// Artifact rendering or filesystem failure.
    #[error("artifact rendering failed: {0}")]
    Render(String),
}

impl PipelineError {
    /// Stable machine-readable kind string, used in structured error
    /// responses and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream",
            Self::Contract(_) => "contract_violation",
            Self::DataSource(_) => "data_source",
            Self::Render(_) => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineError;

    #[test]
    fn kind_strings_are_stable() {
        let cases = [
            (PipelineError::Configuration("missing key".into()), "configuration"),
            (
                PipelineError::Transport {
                    endpoint: "https://example.test".into(),
                    message: "timed out".into(),
                },
                "transport",
            ),
            (PipelineError::Upstream { status: 502, body: "bad gateway".into() }, "upstream"),
            (PipelineError::Contract("not an object".into()), "contract_violation"),
            (PipelineError::DataSource("fetch failed".into()), "data_source"),
            (PipelineError::Render("template error".into()), "render"),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind);
        }
    }

    #[test]
    fn upstream_display_carries_status_and_body() {
        let error = PipelineError::Upstream { status: 429, body: "rate limited".into() };
        let rendered = error.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("rate limited"));
    }
}
