//! Workload forwarding gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────┐
//!                         │                 WORKLOAD GATEWAY                  │
//!                         │                                                   │
//!   hosts.yaml (HTTPS) ───┼─▶ config::source ─▶ config::store (ArcSwap)       │
//!                         │                          │                        │
//!                         │                          ▼                        │
//!                         │                  routing::registrar               │
//!                         │                          │                        │
//!   Client Request        │   ┌──────────┐    ┌──────▼──────┐   ┌──────────┐  │
//!   ──────────────────────┼──▶│  http    │───▶│  providers  │──▶│ forward  │──┼──▶ https://{host}
//!                         │   │  server  │    │  (example)  │   │          │  │
//!   ◀─────────────────────┼───┤          │◀───┤             │◀──┤          │◀─┼───
//!                         │   └──────────┘    └─────────────┘   └──────────┘  │
//!                         │                                                   │
//!                         │   /config → live table   |   * → placeholder      │
//!                         └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use workload_gateway::config::loader::load_config;
use workload_gateway::config::validation::validate_config;
use workload_gateway::config::{ConfigError, GatewayConfig};
use workload_gateway::lifecycle::startup;
use workload_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "workload-gateway")]
#[command(about = "Forwards requests to workload backends from a remote hosts document", long_about = None)]
struct Cli {
    /// Gateway settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the workloads document URL.
    #[arg(long)]
    source_url: Option<String>,

    /// Override the listener port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "workload-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        source_url = %config.source.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(url) = &cli.source_url {
        config.source.url = url.clone();
    }
    if let Some(port) = cli.port {
        if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
            addr.set_port(port);
            config.listener.bind_address = addr.to_string();
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
