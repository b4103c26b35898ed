use std::path::PathBuf;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    output_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub output_dir: HealthCheck,
    pub checked_at: String,
}

pub fn router(output_dir: PathBuf) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { output_dir })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let output_dir = output_dir_check(&state.output_dir).await;
    let ready = output_dir.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "procsight-server runtime initialized".to_string(),
        },
        output_dir,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn output_dir_check(output_dir: &PathBuf) -> HealthCheck {
    match tokio::fs::create_dir_all(output_dir).await {
        Ok(()) => HealthCheck {
            status: "ready",
            detail: format!("artifact directory {} is writable", output_dir.display()),
        },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("artifact directory {} unavailable: {error}", output_dir.display()),
        },
    }
}
