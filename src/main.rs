//! Edge Path Router
//!
//! A prefix-routing edge proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 EDGE ROUTER                   │
//!                      │                                               │
//!   Client Request     │  ┌──────────┐    ┌──────────────┐            │
//!   ──────────────────▶│  │ dispatch │───▶│   routing    │            │
//!                      │  │  server  │    │ table+matcher│            │
//!                      │  └────┬─────┘    └──────────────┘            │
//!                      │       │                                       │
//!                      │       ▼                                       │
//!   Client Response    │  ┌──────────┐                                 │
//!   ◀──────────────────│  │ backend  │◀────────────────────────────────┼──── Origin
//!                      │  │ registry │  (authority rewrite + forward)  │
//!                      │  └──────────┘                                 │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  config (load/validate/watch)            │ │
//!                      │  │  observability (tracing, metrics)        │ │
//!                      │  │  lifecycle (graceful shutdown)           │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_router::config::{load_config, ConfigWatcher, RouterConfig};
use edge_router::dispatch::RouterServer;
use edge_router::lifecycle::Shutdown;
use edge_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Prefix-routing edge proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // An invalid config must never start serving; fail before binding.
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        backends = config.backends.len(),
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Watch the config file for route table rebuilds; without a file
    // there is nothing to watch and the update channel stays silent.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            (Some(handle), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server = RouterServer::new(config)?;
    tracing::info!(entries = server.route_count(), "Route table compiled");

    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
