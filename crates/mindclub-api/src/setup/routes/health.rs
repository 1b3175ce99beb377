//! Health check handlers and response types.

use crate::constants::{HEALTH_CHECK_TIMEOUT_SECS, HEALTH_PROBE_FILE_ID};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mindclub_storage::StorageError;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

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
    pub database: String,
    pub storage: String,
    pub database_backend: &'static str,
    pub storage_backend: &'static str,
    pub payments: &'static str,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Database and media store reachability. A missing database fails the check;
/// a media store problem only degrades it.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

    let store = state.store.clone();
    let database = run_check(timeout, async move { store.ping().await }, "unhealthy").await;

    let media_store = state.media.store().clone();
    let storage = run_check(
        timeout,
        async move {
            match media_store.get_details(HEALTH_PROBE_FILE_ID).await {
                Ok(_) | Err(StorageError::NotFound(_)) => Ok(()),
                Err(e) => Err(e),
            }
        },
        "degraded",
    )
    .await;

    let database_ok = database == "healthy";
    let status = if !database_ok {
        tracing::error!(database = %database, "Health check failed");
        "unhealthy"
    } else if storage != "healthy" {
        tracing::warn!(storage = %storage, "Media store degraded");
        "degraded"
    } else {
        "healthy"
    };

    let response = HealthCheckResponse {
        status: status.to_string(),
        database,
        storage,
        database_backend: state.store.backend_name(),
        storage_backend: state.media.store().backend_name(),
        payments: if state.enrollments.payments_enabled() {
            "enabled"
        } else {
            "disabled"
        },
    };

    let status_code = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
