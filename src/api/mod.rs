//! # API Module
//!
//! The HTTP surface of the exporter, pull-based only:
//!
//! - `GET /metrics` - Current snapshot in the Prometheus text format
//! - `GET /health` - Liveness probe for the orchestration layer
//! - any other path - Falls back to the snapshot
//!
//! The collector scrapes this endpoint on its own schedule; the process never
//! pushes anything anywhere.

pub mod handlers;
pub mod server;

// Re-export commonly used items
pub use server::{bind, create_app, serve};
