//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Fetch the workloads document once and load the store
//! - Build providers, routes and the HTTP server
//! - Install signal handlers and serve until shutdown
//!
//! # Design Decisions
//! - A missing or broken workloads document is not fatal: the gateway starts
//!   with an empty table and answers 404 for every workload
//! - Bind and TLS errors are fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ConfigSource, ConfigStore, GatewayConfig};
use crate::forward::{Forwarder, HttpUpstream};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_reload_on_sighup;
use crate::observability::metrics;
use crate::providers::ProviderRegistry;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid address '{0}'")]
    Address(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the gateway until a termination signal arrives.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = parse_addr(&config.observability.metrics_address)?;
        metrics::init_metrics(addr)?;
    }

    let source = ConfigSource::new(&config.source)?;
    let store = Arc::new(ConfigStore::new());
    store.replace(source.load().await);

    let forwarder = Forwarder::new(Arc::new(HttpUpstream::default()));
    let registry = ProviderRegistry::builtin(store.clone(), forwarder);

    let addr = parse_addr(&config.listener.bind_address)?;
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config, store.clone(), &registry);

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    spawn_reload_on_sighup(source, store, shutdown.subscribe());

    match tls {
        Some(tls) => server.run_tls(addr, &tls, shutdown.subscribe()).await?,
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?
        }
    }

    Ok(())
}

fn parse_addr(raw: &str) -> Result<SocketAddr, StartupError> {
    raw.parse()
        .map_err(|_| StartupError::Address(raw.to_string()))
}
