//! User gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 USER GATEWAY                 │
//!     Client Request       │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!     ─────────────────────┼─▶│  http  │──▶│  users   │──▶│   users    │──┼──▶ User
//!                          │  │ server │   │ service  │   │   client   │  │    Service
//!     Client Response      │  │        │   │(classify)│   │ (reqwest)  │  │
//!     ◀────────────────────┼──│        │◀──│          │◀──│            │◀─┼───
//!                          │  └────────┘   └──────────┘   └────────────┘  │
//!                          │                                              │
//!                          │  config · observability · health · lifecycle │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use user_gateway::config::{load_config, GatewayConfig};
use user_gateway::observability::{logging, metrics};
use user_gateway::{HttpServer, HttpUserServiceClient, Shutdown, UserProxyService};

#[derive(Parser)]
#[command(name = "user-gateway")]
#[command(about = "Gateway proxy for the user-management service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("user-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        user_service = %config.user_service.base_url,
        request_timeout_ms = config.user_service.request_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr, &config.observability.application) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let client = HttpUserServiceClient::new(&config.user_service)?;
    let users = UserProxyService::new(Arc::new(client));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, users);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
