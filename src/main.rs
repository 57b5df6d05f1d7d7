//! Action gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ gateway ──▶ route table ──▶ binder ──┐
//!                     (request id,    (state       (action →       (params, │
//!                      trace, limits)  machine)     RouteSpec)      secrets) │
//!                                                                           ▼
//!     Client Response                                                 dispatcher
//!     ◀────────────── CORS ◀── response translator ◀─────────────── (one call,
//!                                                                    deadline)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use action_gateway::config::load_or_default;
use action_gateway::observability::{logging, metrics};
use action_gateway::{HttpServer, SecretStore, Shutdown};

#[derive(Parser)]
#[command(name = "action-gateway", version, about = "Action-routed API gateway")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("action-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let secrets = SecretStore::from_env();
    for name in secrets.missing() {
        tracing::warn!(secret = %name, "Secret not configured; dependent actions will fail");
    }

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
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, secrets)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
