//! Configuration management for the delivery metrics exporter.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command line overrides applied by `main`. The
//! environment names (`METRICS_PORT`, `PENDING_MODE`) are the contract the
//! container orchestration relies on.

use crate::core::error::{Error, Result};
use crate::simulation::PendingMode;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "delivery-metrics.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP exposition server configuration
    pub server: ServerConfig,

    /// Delivery simulation configuration
    pub simulation: SimulationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Exposition server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub host: IpAddr,

    /// Port the listener binds to; `METRICS_PORT` overrides it
    pub port: u16,
}

/// Simulation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Range used for pending deliveries; `PENDING_MODE` overrides it
    pub pending_mode: PendingMode,

    /// Time between generation cycles, e.g. "1s" or "500ms"
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pending_mode: PendingMode::Normal,
            interval: Duration::from_secs(1),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from(DEFAULT_CONFIG_FILE)
        } else {
            let mut config = Config::default();
            config.apply_env_overrides()?;
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific TOML file, then the environment.
    /// The environment is read on every startup path, so `METRICS_PORT` and
    /// `PENDING_MODE` win over file values here too.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(port) = env::var("METRICS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid METRICS_PORT {:?}: {}", port, e)))?;
        }

        if let Ok(mode) = env::var("PENDING_MODE") {
            self.simulation.pending_mode = mode.parse()?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.simulation.interval.is_zero() {
            return Err(Error::config("Simulation interval must be non-zero"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Full socket address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// Custom deserializer for Duration from strings like "1s" or "500ms"
fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string like '1s' or '500ms'")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            parse_duration(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_str(DurationVisitor)
}

// Simple duration parser for common formats
fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    if let Some(ms) = s.strip_suffix("ms") {
        let ms: u64 = ms.parse().map_err(|_| "Invalid milliseconds")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(secs) = s.strip_suffix('s') {
        let secs: u64 = secs.parse().map_err(|_| "Invalid seconds")?;
        Ok(Duration::from_secs(secs))
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().map_err(|_| "Invalid minutes")?;
        Ok(Duration::from_secs(mins * 60))
    } else {
        // Try parsing as raw seconds
        let secs: u64 = s.parse().map_err(|_| "Invalid duration format")?;
        Ok(Duration::from_secs(secs))
    }
}
