//! forwardhook
//!
//! Relays feed-reader webhooks to one or more downstream endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 FORWARDHOOK                  │
//!   Feed reader          │  ┌────────┐   ┌────────┐   ┌──────────────┐  │
//!   ─────── POST / ──────┼─▶│  http  │──▶│  feed  │──▶│   fulltext   │  │
//!   ◀────── 200 OK ──────┼──│ server │   │ parse  │   │  (optional)  │  │
//!                        │  └────────┘   └────────┘   └──────┬───────┘  │
//!                        │                                   ▼          │
//!                        │                         ┌──────────────────┐ │
//!                        │                         │  relay::FanOut   │ │
//!                        │                         └──┬────────────┬──┘ │
//!                        │                 Dispatcher │            │ Dispatcher
//!                        │                 (retries)  ▼            ▼    │
//!                        └────────────────────── destination A ─ destination B
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use forwardhook::config::{self, RelayConfig};
use forwardhook::lifecycle::{signals, Shutdown};
use forwardhook::observability::{logging, metrics};
use forwardhook::HttpServer;

#[derive(Parser)]
#[command(name = "forwardhook")]
#[command(about = "Relay feed-reader webhooks to downstream endpoints", long_about = None)]
struct Cli {
    /// TOML configuration file. FORWARDHOOK_* variables override it.
    #[arg(short, long, env = "FORWARDHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<RelayConfig, config::ConfigError> {
    let lookup = |key: &str| {
        if key == config::loader::ENV_BIND {
            if let Some(bind) = &cli.bind {
                return Some(bind.clone());
            }
        }
        std::env::var(key).ok()
    };
    config::load(cli.config.as_deref(), lookup)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("forwardhook: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("forwardhook v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        destinations = ?config.destinations,
        max_attempts = config.retries.max_attempts,
        backoff_secs = config.retries.backoff_secs,
        fulltext = config.fulltext.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
