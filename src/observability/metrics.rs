//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_forward_requests_total` (counter): forwarded requests by workload, method, status
//! - `gateway_forward_duration_seconds` (histogram): forward latency by workload
//! - `gateway_config_workloads` (gauge): workloads in the live table
//! - `gateway_config_reloads_total` (counter): reload attempts by outcome
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of one forwarded request.
pub fn record_forward(workload: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_forward_requests_total",
        "workload" => workload.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_forward_duration_seconds",
        "workload" => workload.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_config_loaded(workloads: usize) {
    gauge!("gateway_config_workloads").set(workloads as f64);
}

pub fn record_reload(outcome: &'static str) {
    counter!("gateway_config_reloads_total", "outcome" => outcome).increment(1);
}
