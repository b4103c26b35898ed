//! Narration synthesis over an ElevenLabs-compatible text-to-speech API.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use procsight_core::config::SpeechConfig;
use procsight_core::PipelineError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::info;

use crate::paths::checked_filename;

const VOICE_STABILITY: f32 = 0.55;
const VOICE_SIMILARITY_BOOST: f32 = 0.65;
const VOICE_STYLE: f32 = 0.3;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio artifact and return its path.
    async fn synthesize(&self, text: &str, filename: &str) -> Result<PathBuf, PipelineError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

/// HTTP client for the v1 text-to-speech endpoint.
///
/// The credential is checked before any network attempt; a missing key is a
/// configuration error, not a transport one.
pub struct ElevenLabsSynthesizer {
    http: reqwest::Client,
    config: SpeechConfig,
    output_dir: PathBuf,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: SpeechConfig, output_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| {
                PipelineError::Configuration(format!("could not build speech client: {err}"))
            })?;

        Ok(Self { http, config, output_dir: output_dir.into() })
    }

    fn api_key(&self) -> Result<&SecretString, PipelineError> {
        self.config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "speech.api_key is not configured; set PROCSIGHT_SPEECH_API_KEY or [speech].api_key"
                        .to_string(),
                )
            })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, filename: &str) -> Result<PathBuf, PipelineError> {
        let api_key = self.api_key()?;
        let filename = checked_filename(filename)?;
        let url = self.endpoint();

        let request = SynthesisRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: VOICE_STABILITY,
                similarity_boost: VOICE_SIMILARITY_BOOST,
                style: VOICE_STYLE,
                use_speaker_boost: true,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", api_key.expose_secret())
            .query(&[("output_format", self.config.output_format.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| transport_error(&url, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream { status: status.as_u16(), body });
        }

        let audio = response.bytes().await.map_err(|err| transport_error(&url, err))?;

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|err| {
            PipelineError::Render(format!(
                "could not create output directory {}: {err}",
                self.output_dir.display()
            ))
        })?;

        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, &audio).await.map_err(|err| {
            PipelineError::Render(format!("could not write audio {}: {err}", path.display()))
        })?;

        info!(
            event_name = "render.speech.written",
            path = %path.display(),
            bytes = audio.len(),
            "narration audio written"
        );

        Ok(path)
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
