//! Delivery metrics exporter binary
//!
//! Startup order matters: configuration is resolved and the listener is bound
//! before the simulation loop starts, so an unusable port terminates the
//! process with a non-zero status and nothing half-running.

use clap::{Arg, Command};
use delivery_metrics::core::{Config, Error, Result};
use delivery_metrics::metrics::DeliveryMetrics;
use delivery_metrics::simulation::Simulator;
use delivery_metrics::{api, init_tracing};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("delivery-metrics")
        .version(delivery_metrics::VERSION)
        .about("Simulates delivery-logistics metrics and exposes them for Prometheus.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Exposition listen port"),
        )
        .arg(
            Arg::new("pending-mode")
                .long("pending-mode")
                .value_name("MODE")
                .help("Pending-deliveries mode (normal, high)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        Config::load_from(config_path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    init_tracing(&config.logging);

    info!(
        "Starting delivery-metrics v{} (pending_mode={})",
        delivery_metrics::VERSION,
        config.simulation.pending_mode
    );

    let metrics = Arc::new(DeliveryMetrics::new()?);

    // Bind before the simulation starts; an unavailable port is fatal.
    let listener = match api::bind(config.server.socket_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    let simulator = Simulator::new(config.simulation.clone(), metrics.clone());
    let sim_handle = tokio::spawn(simulator.run());
    let server_handle = tokio::spawn(api::serve(listener, metrics));

    // Run until externally stopped
    shutdown_signal().await;
    warn!("Received shutdown signal, stopping");

    sim_handle.abort();
    server_handle.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port
            .parse()
            .map_err(|e| Error::config(format!("Invalid port: {}", e)))?;
    }

    if let Some(mode) = matches.get_one::<String>("pending-mode") {
        config.simulation.pending_mode = mode.parse()?;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    Ok(())
}

/// Wait for ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
