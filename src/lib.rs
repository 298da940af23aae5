//! Delivery Metrics - a demonstration Prometheus exporter
//!
//! Fabricates random delivery-logistics numbers on a fixed cadence and
//! exposes them over HTTP in the Prometheus text exposition format. Together
//! with the Prometheus, Grafana and compose configuration in this repository
//! it forms a self-contained monitoring demo; there is no real delivery
//! system behind it.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod api;
pub mod metrics;
pub mod simulation;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing with the configured level; `RUST_LOG` wins when set
pub fn init_tracing(logging: &crate::core::config::LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
