//! Error types for the delivery metrics exporter.
//!
//! The taxonomy is deliberately small: the generation loop is pure in-memory
//! arithmetic and has no failure modes, so everything here is about startup
//! (configuration, metric registration, binding the listener).

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the exporter
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors, including unbindable listen ports
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prometheus metric registration or encoding errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
