//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from configuration
//! - Build the server and bind the listener
//! - Serve until a termination signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is loaded by the caller so load errors surface before
//!   logging is up

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, MirrorConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{logging, metrics};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the proxy with a validated configuration until shutdown.
pub async fn run(config: MirrorConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mirror-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        primary = %config.upstreams.primary,
        secondary = %config.upstreams.secondary,
        secondary_timeout_secs = ?config.upstreams.secondary_timeout_secs,
        sample_percent = config.comparison.sample_percent,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
