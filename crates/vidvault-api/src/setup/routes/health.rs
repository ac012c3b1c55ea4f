//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub metadata_store: String,
    pub blob_backend: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the metadata store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metadata_store = run_check(TIMEOUT, state.store.health_check(), "not_ready").await;

    if metadata_store == "healthy" {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "metadata_store": "ready" })),
        )
    } else {
        tracing::error!(metadata_store = %metadata_store, "Readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "not_ready", "metadata_store": metadata_store })),
        )
    }
}

/// Full health check. The blob backend is reported, not probed: deletes are best effort.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        metadata_store: run_check(TIMEOUT, state.store.health_check(), "unhealthy").await,
        blob_backend: state.blobs.backend_type().to_string(),
    };

    let status_code = if response.metadata_store == "healthy" {
        StatusCode::OK
    } else {
        tracing::error!(metadata_store = %response.metadata_store, "Health check failed");
        response.status = "unhealthy".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
