//! HTTP request handlers for the exposition endpoint

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::metrics::SharedMetrics;

// Pinned when the router is built, so /health reports process uptime rather
// than time since the first probe.
static STARTED: Lazy<Instant> = Lazy::new(Instant::now);

pub(crate) fn mark_started() {
    Lazy::force(&STARTED);
}

/// Health check payload
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process is answering at all
    pub status: String,
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}

/// Serve the current snapshot in the Prometheus text exposition format.
/// Registered for `/metrics` and as the router fallback, so a collector
/// pointed at any path still gets data. Never blocks on the generation loop.
pub async fn metrics_handler(
    State(metrics): State<SharedMetrics>,
) -> Result<impl IntoResponse, StatusCode> {
    let body = metrics.encode().map_err(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

/// Liveness probe for the orchestration layer
pub async fn health_check() -> Result<Json<HealthResponse>, StatusCode> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: STARTED.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
