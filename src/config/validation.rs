//! Configuration validation.
//!
//! Semantic checks on top of what serde accepts. Settings validation returns
//! every error, not just the first. Workload validation decides whether a
//! single table entry can be turned into routes.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, WorkloadDescriptor};

/// Name reserved for the configuration dump endpoint.
pub const RESERVED_CONFIG_PATH: &str = "config";

/// A single settings validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("source url '{0}' must be an http(s) URL")]
    SourceUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate gateway settings, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    match Url::parse(&config.source.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::SourceUrl(config.source.url.clone())),
    }

    if config.source.timeout_secs == 0 {
        errors.push(ValidationError::Zero("source.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Why a workload entry cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadIssue {
    #[error("workload name '{0}' cannot be used as a path segment")]
    UnroutableName(String),

    #[error("workload name '{0}' is reserved")]
    ReservedName(String),

    #[error("workload '{0}' has an empty host")]
    EmptyHost(String),
}

/// Check that a table entry can become a set of routes.
pub fn validate_workload(name: &str, descriptor: &WorkloadDescriptor) -> Result<(), WorkloadIssue> {
    if name.is_empty() || name.contains(['/', '{', '}', '*']) {
        return Err(WorkloadIssue::UnroutableName(name.to_string()));
    }
    if name == RESERVED_CONFIG_PATH {
        return Err(WorkloadIssue::ReservedName(name.to_string()));
    }
    if descriptor.host.trim().is_empty() {
        return Err(WorkloadIssue::EmptyHost(name.to_string()));
    }
    Ok(())
}
