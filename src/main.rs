//! Hierarchical configuration tree service.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup
//!   ───────
//!   settings (TOML) ──▶ loader ──fetch──▶ http(s) / file / resource
//!                        │  parse JSON|XML, expand includes, validate
//!                        ▼
//!                   Arc<ServiceState>  (immutable tree, or empty + error)
//!
//!   serving
//!   ───────
//!   Client ──▶ http server ──▶ /tree?level=term   ──▶ matching ──┐
//!                         ├──▶ /tree/{path}       ──▶ lookup   ──┤
//!                         ├──▶ /status, /version                 │
//!                         ◀── caching (ETag, Last-Modified, 304) ◀┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use config_service::config::resolve_config;
use config_service::lifecycle::{bootstrap, signals, Shutdown};
use config_service::observability::{init_logging, init_metrics};
use config_service::HttpServer;

#[derive(Parser)]
#[command(name = "config-service")]
#[command(about = "Serves hierarchical configuration trees over HTTP", long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults to $CONFIG_SERVICE_CONFIG, then built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    init_logging(&config.observability)?;
    tracing::info!("config-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tree_uri = %config.tree.uri,
        request_timeout_secs = config.timeouts.request_secs,
        "Settings loaded"
    );

    if config.observability.metrics_enabled {
        init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let service = Arc::new(bootstrap(&config).await);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    HttpServer::new(&config, service).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
