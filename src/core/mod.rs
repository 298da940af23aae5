//! Core foundations of the exporter: configuration and error handling.

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::Config;
pub use error::{Error, Result};
