//! Prepared response server.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config::load_config ──▶ lifecycle::prepare_artifacts
//!                                                   │
//!                                                   ▼
//!                                  PreparedResponse (etag, headers, gzip task)
//!                                                   │
//!   Client Request ──▶ http::server ──▶ respond ────┘
//!   Client Response ◀── 304 | gzip | raw
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prepared_response::config::{load_config, ServerConfig};
use prepared_response::lifecycle::{prepare_artifacts, Shutdown};
use prepared_response::observability::{logging, metrics};
use prepared_response::HttpServer;

#[derive(Parser)]
#[command(name = "prepared-response")]
#[command(about = "Serve precomputed responses with ETag and gzip negotiation", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!("prepared-response v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        artifacts = config.artifacts.len(),
        request_timeout_secs = config.timeouts.request_secs,
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

    let artifacts = prepare_artifacts(&config)?;
    if artifacts.is_empty() {
        tracing::warn!("No artifacts configured; every request will return 404");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, artifacts);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
