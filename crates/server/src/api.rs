//! JSON API routes for the analysis pipeline.
//!
//! Endpoints:
//! - `POST /analyze`   — run the orchestrator only, return `{raw, analysis}`
//! - `POST /run-agent` — full agent run with optional slide/narration steps
//! - `POST /ppt`       — render a deck from caller-supplied content
//! - `POST /tts`       — synthesize caller-supplied text
//! - `GET  /download`  — serve a previously produced artifact by path
//!
//! Every pipeline failure maps to one structured non-2xx body carrying the
//! error kind and a correlation id; the handlers never catch-and-continue.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use procsight_agent::AgentRunner;
use procsight_core::{AnalysisResult, PipelineError, TelemetryRecord};
use procsight_render::DeckSpec;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

const DEFAULT_QUERY: &str = "Show weekly bottlenecks";

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<AgentRunner>,
    pub output_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub raw: TelemetryRecord,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunAgentRequest {
    pub query: Option<String>,
    pub make_ppt: Option<bool>,
    pub narrate: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PptRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub kpis: BTreeMap<String, f64>,
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PptResponse {
    pub ppt_path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    pub text: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub audio_path: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub kind: &'static str,
    pub correlation_id: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/run-agent", post(run_agent))
        .route("/ppt", post(ppt))
        .route("/tts", post(tts))
        .route("/download", get(download))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = request_id();
    let query = body.query.as_deref().unwrap_or(DEFAULT_QUERY);

    info!(
        event_name = "api.analyze.requested",
        correlation_id = %correlation_id,
        query = %query,
        "analysis requested"
    );

    let (raw, analysis) = state
        .runner
        .pipeline()
        .analyze(query)
        .await
        .map_err(|err| pipeline_error_response(err, &correlation_id))?;

    Ok(Json(AnalyzeResponse { raw, analysis }))
}

pub async fn run_agent(
    State(state): State<AppState>,
    Json(body): Json<RunAgentRequest>,
) -> Result<Json<procsight_core::AgentRunResult>, (StatusCode, Json<ApiError>)> {
    let correlation_id = request_id();
    let query = body.query.as_deref().unwrap_or(DEFAULT_QUERY);
    let make_ppt = body.make_ppt.unwrap_or(true);
    let narrate = body.narrate.unwrap_or(true);

    info!(
        event_name = "api.run_agent.requested",
        correlation_id = %correlation_id,
        query = %query,
        make_ppt,
        narrate,
        "agent run requested"
    );

    let result = state
        .runner
        .run(query, make_ppt, narrate)
        .await
        .map_err(|err| pipeline_error_response(err, &correlation_id))?;

    Ok(Json(result))
}

pub async fn ppt(
    State(state): State<AppState>,
    Json(body): Json<PptRequest>,
) -> Result<Json<PptResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = request_id();

    let deck = DeckSpec {
        title: body.title.unwrap_or_else(|| "Process Intelligence - Bottlenecks".to_string()),
        summary: body.summary.unwrap_or_else(|| "Weekly insights".to_string()),
        lines: body.bullets,
        kpis: body.kpis,
        filename: body.filename.unwrap_or_else(|| "bottlenecks.html".to_string()),
    };

    let path = state
        .runner
        .deck()
        .render_deck(&deck)
        .await
        .map_err(|err| pipeline_error_response(err, &correlation_id))?;

    Ok(Json(PptResponse { ppt_path: path.display().to_string() }))
}

pub async fn tts(
    State(state): State<AppState>,
    Json(body): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = request_id();
    let text = body.text.unwrap_or_else(|| "No narration provided.".to_string());
    let filename = body.filename.unwrap_or_else(|| "narration.mp3".to_string());

    let path = state
        .runner
        .speech()
        .synthesize(&text, &filename)
        .await
        .map_err(|err| pipeline_error_response(err, &correlation_id))?;

    Ok(Json(TtsResponse { audio_path: path.display().to_string() }))
}

/// Serve an artifact file from the output directory.
///
/// The caller passes back a path previously returned by the pipeline; any
/// path that does not resolve inside the output directory is reported as
/// not found, never served.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let correlation_id = request_id();

    let resolved = resolve_artifact(&state.output_dir, Path::new(&query.path))
        .ok_or_else(|| not_found(&query.path, &correlation_id))?;

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| not_found(&query.path, &correlation_id))?;

    let filename = resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&resolved))
        .header(header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))
        .body(Body::from(bytes))
        .map_err(|err| {
            pipeline_error_response(PipelineError::Render(err.to_string()), &correlation_id)
        })?;

    Ok(response)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_artifact(output_dir: &Path, requested: &Path) -> Option<PathBuf> {
    let output_dir = output_dir.canonicalize().ok()?;
    let resolved = requested.canonicalize().ok()?;
    resolved.starts_with(&output_dir).then_some(resolved)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("mp3") => "audio/mpeg",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

fn not_found(requested: &str, correlation_id: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: format!("artifact `{requested}` was not found"),
            kind: "not_found",
            correlation_id: correlation_id.to_string(),
        }),
    )
}

fn pipeline_error_response(
    error: PipelineError,
    correlation_id: &str,
) -> (StatusCode, Json<ApiError>) {
    let status = match &error {
        PipelineError::Configuration(_) | PipelineError::Render(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PipelineError::Contract(_) | PipelineError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        PipelineError::Transport { .. } | PipelineError::DataSource(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    error!(
        event_name = "api.pipeline.failed",
        correlation_id = %correlation_id,
        kind = error.kind(),
        error = %error,
        "pipeline run failed"
    );

    (
        status,
        Json(ApiError {
            error: error.to_string(),
            kind: error.kind(),
            correlation_id: correlation_id.to_string(),
        }),
    )
}

fn request_id() -> String {
    format!("REQ-{}", &Uuid::new_v4().simple().to_string()[..12])
}
