//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Key probed on the storage backend; it never exists, only reachability matters.
const STORAGE_PROBE_KEY: &str = "health-check/non-existent-key";

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
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
    pub version: &'static str,
    pub storage: String,
    pub signing: String,
}

/// Sign a throwaway parameter set to prove the signer is usable.
fn check_signer(state: &AppState) -> Result<(), crate::signing::SigningError> {
    let mut probe = BTreeMap::new();
    probe.insert("timestamp".to_string(), "0".to_string());
    state.signer.sign(&probe).map(drop)
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - credentials can be issued.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match check_signer(&state) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "signing": "ready" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Signer readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "not_ready", "signing": "not_ready" })),
            )
        }
    }
}

/// Full health check (signer and storage backend).
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let signing = match check_signer(&state) {
        Ok(()) => "healthy".to_string(),
        Err(e) => format!("unhealthy: {}", e),
    };

    let storage = state.storage.clone();
    let storage = run_check(
        CHECK_TIMEOUT,
        async move { storage.exists(STORAGE_PROBE_KEY).await.map(drop) },
        "degraded",
    )
    .await;

    let overall_healthy = signing == "healthy";
    let status = if !overall_healthy {
        "unhealthy"
    } else if storage != "healthy" {
        "degraded"
    } else {
        "healthy"
    };

    let response = HealthCheckResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        storage,
        signing,
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
