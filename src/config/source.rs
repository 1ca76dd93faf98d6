//! Remote workloads document fetching.

use std::time::Duration;

use crate::config::loader::{parse_table, ConfigError};
use crate::config::schema::{ConfigTable, SourceConfig};
use crate::config::store::ConfigStore;
use crate::observability::metrics;

/// Fetches the workloads document over HTTP(S).
#[derive(Debug, Clone)]
pub struct ConfigSource {
    client: reqwest::Client,
    url: String,
}

impl ConfigSource {
    /// Create a source for the configured URL.
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the document, surfacing every failure.
    pub async fn fetch(&self) -> Result<ConfigTable, ConfigError> {
        tracing::debug!(url = %self.url, "Fetching workloads document");
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_table(&body)
    }

    /// Fetch and parse the document, degrading to an empty table on failure.
    pub async fn load(&self) -> ConfigTable {
        match self.fetch().await {
            Ok(table) => {
                tracing::info!(url = %self.url, workloads = table.len(), "Workloads document loaded");
                table
            }
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "Error fetching workloads document");
                ConfigTable::new()
            }
        }
    }
}

/// What a reload did to the live table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// The fetch failed or yielded nothing; the current table stays.
    Kept,
}

/// Re-fetch the document and swap it into `store` when it yields workloads.
///
/// Routes are fixed when the server starts, so workloads that are new in the
/// fetched table only become reachable after a restart.
pub async fn reload(source: &ConfigSource, store: &ConfigStore) -> ReloadOutcome {
    let table = match source.fetch().await {
        Ok(table) if !table.is_empty() => table,
        Ok(_) => {
            tracing::warn!(url = %source.url(), "Reloaded workloads document is empty, keeping current table");
            metrics::record_reload("empty");
            return ReloadOutcome::Kept;
        }
        Err(e) => {
            tracing::error!(url = %source.url(), error = %e, "Reload failed, keeping current table");
            metrics::record_reload("failed");
            return ReloadOutcome::Kept;
        }
    };

    let current = store.snapshot();
    let added: Vec<&String> = table.keys().filter(|name| !current.contains_key(*name)).collect();
    if !added.is_empty() {
        tracing::warn!(workloads = ?added, "New workloads need a restart to receive routes");
    }

    store.replace(table);
    metrics::record_reload("applied");
    ReloadOutcome::Applied
}
