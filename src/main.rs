//! Faculty admin gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  GATEWAY                     │
//!   Admin UI request     │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│  proxy   │──▶│ resolver │──┼──▶ primary (local)
//!                        │  │ server  │    │ handler  │   │  cache + │  │
//!   ◀────────────────────┼──│         │◀───│          │◀──│  probe   │──┼──▶ secondary (tunnel)
//!                        │  └─────────┘    └──────────┘   └──────────┘  │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use faculty_gateway::config::load_layered;
use faculty_gateway::lifecycle::{signals, Shutdown};
use faculty_gateway::observability::{logging, metrics};
use faculty_gateway::{EndpointResolver, GatewayServer};

#[derive(Parser)]
#[command(name = "faculty-gateway")]
#[command(about = "Admin API gateway with backend endpoint failover", long_about = None)]
struct Args {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_layered(args.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("faculty-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = %config.resolver.mode,
        primary = %config.resolver.primary_url,
        secondary = %config.resolver.secondary_url,
        freshness_ms = config.resolver.freshness_ms,
        timeout_ms = config.resolver.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let resolver = Arc::new(EndpointResolver::from_config(&config.resolver)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config, resolver, shutdown.subscribe());

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
