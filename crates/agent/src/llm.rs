//! Chat-completion client for an OpenAI-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use procsight_core::config::LlmConfig;
use procsight_core::PipelineError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One chat message in provider wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// A chat-completion backend.
///
/// `model` overrides the configured default when present. Implementations
/// must return the first completion's raw text unmodified; interpretation
/// belongs to the contract parser, not the client.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<String, PipelineError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessageBody,
}

#[derive(Debug, Deserialize)]
struct CompletionMessageBody {
    #[serde(default)]
    content: String,
}

/// Production client for OpenRouter's chat-completions endpoint.
///
/// One synchronous request per call with the configured timeout; no retry,
/// no streaming. The credential comes from the injected config and is
/// checked before any network attempt.
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenRouterClient {
    pub fn new(config: LlmConfig) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| {
                PipelineError::Configuration(format!("could not build llm client: {err}"))
            })?;

        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&SecretString, PipelineError> {
        self.config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "llm.api_key is not configured; set PROCSIGHT_LLM_API_KEY or [llm].api_key"
                        .to_string(),
                )
            })
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<String, PipelineError> {
        let api_key = self.api_key()?;
        let model = model.unwrap_or(self.config.model.as_str());

        let request = CompletionRequest {
            model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        info!(
            event_name = "agent.llm.request",
            endpoint = %self.config.base_url,
            model = %model,
            message_count = messages.len(),
            "sending completion request"
        );

        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| transport_error(&self.config.base_url, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream { status: status.as_u16(), body });
        }

        let payload: CompletionResponse =
            response.json().await.map_err(|err| transport_error(&self.config.base_url, err))?;

        let choice = payload.choices.into_iter().next().ok_or_else(|| {
            PipelineError::Upstream {
                status: status.as_u16(),
                body: "completion response contained no choices".to_string(),
            }
        })?;

        Ok(choice.message.content)
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> PipelineError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };

    PipelineError::Transport { endpoint: endpoint.to_string(), message }
}

#[cfg(test)]
mod tests {
    use procsight_core::config::LlmConfig;
    use procsight_core::PipelineError;

    use super::{ChatClient, ChatMessage, OpenRouterClient};

    fn llm_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(|key| key.to_string().into()),
            // Unroutable on purpose: a client that attempts the network
            // surfaces a transport failure instead of the expected one.
            base_url: "http://127.0.0.1:9".to_string(),
            model: "mistralai/mistral-7b-instruct".to_string(),
            timeout_secs: 1,
            temperature: 0.2,
            max_tokens: 1200,
        }
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::system("You are an analyst."), ChatMessage::user("Analyze this.")]
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_network_attempt() {
        let client = OpenRouterClient::new(llm_config(None)).expect("client");

        let error = client.complete(&prompt(), None).await.expect_err("missing key");
        assert!(matches!(error, PipelineError::Configuration(_)));
        assert_eq!(error.kind(), "configuration");
    }

    #[tokio::test]
    async fn blank_credential_counts_as_missing() {
        let client = OpenRouterClient::new(llm_config(Some("  "))).expect("client");

        let error = client.complete(&prompt(), None).await.expect_err("blank key");
        assert!(matches!(error, PipelineError::Configuration(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_as_transport_failure() {
        let client = OpenRouterClient::new(llm_config(Some("sk-or-test"))).expect("client");

        let error = client.complete(&prompt(), None).await.expect_err("unroutable endpoint");
        assert!(matches!(error, PipelineError::Transport { .. }));
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, "system");
        assert_eq!(ChatMessage::user("b").role, "user");
    }

    #[test]
    fn request_serializes_in_provider_wire_format() {
        let messages = prompt();
        let request = super::CompletionRequest {
            model: "mistralai/mistral-7b-instruct",
            messages: &messages,
            temperature: 0.2,
            max_tokens: 1200,
        };

        let value = serde_json::to_value(&request).expect("serializable request");
        assert_eq!(value["model"], "mistralai/mistral-7b-instruct");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Analyze this.");
        assert_eq!(value["max_tokens"], 1200);
    }
}
