//! Service gateway.
//!
//! A path-based reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                     GATEWAY                      │
//!   Client Request        │  ┌─────────┐   ┌───────────┐   ┌──────────────┐  │
//!   ──────────────────────┼─▶│  http   │──▶│  routing  │──▶│   registry   │  │
//!   /proxy/{svc}/{path}   │  │ server  │   │ ProxyPath │   │ svc → base   │  │
//!                         │  └─────────┘   └───────────┘   └──────┬───────┘  │
//!                         │                                       ▼          │
//!   Client Response       │  ┌──────────┐                  ┌──────────────┐  │
//!   ◀─────────────────────┼──│ response │◀─────────────────│ http client  │◀─┼── Backend
//!                         │  │translate │                  │ + deadline   │  │
//!                         │  └──────────┘                  └──────────────┘  │
//!                         │                                                  │
//!                         │   config · observability · lifecycle · admin     │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use service_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use service_gateway::observability::{logging, metrics};
use service_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "service-gateway")]
#[command(about = "Path-based gateway for the backend services", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used if omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("service-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        upstream_timeout_ms = config.timeouts.upstream_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    let server = HttpServer::new(&config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
