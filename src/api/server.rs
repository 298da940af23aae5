//! HTTP server for the exposition endpoint

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::core::{Error, Result};
use crate::metrics::SharedMetrics;

/// Creates the exposition router.
///
/// `/metrics` is the canonical scrape path and `/health` answers liveness
/// probes; any other path falls back to the snapshot.
pub fn create_app(metrics: SharedMetrics) -> Router {
    handlers::mark_started();

    Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::metrics_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(metrics)
}

/// Bind the exposition listener, failing fast when the port is unavailable
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        Error::config(format!(
            "Metrics port {} is not available: {}",
            addr.port(),
            e
        ))
    })
}

/// Serve the exposition endpoint until the task is dropped at shutdown
pub async fn serve(listener: TcpListener, metrics: SharedMetrics) -> Result<()> {
    let addr = listener.local_addr()?;
    let app = create_app(metrics);

    tracing::info!("Exposition server listening on http://{}", addr);
    tracing::info!("Scrape endpoint available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
