//! Live workload table.
//!
//! Readers take an `Arc` snapshot once per request and never lock. Writers
//! replace the whole table in one atomic swap, so a reader sees either the old
//! or the new table, never a mix.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ConfigTable;
use crate::observability::metrics;

/// Atomically swappable configuration table.
#[derive(Debug)]
pub struct ConfigStore {
    table: ArcSwap<ConfigTable>,
}

impl ConfigStore {
    /// Create a store holding an empty table.
    pub fn new() -> Self {
        Self::from_table(ConfigTable::new())
    }

    /// Create a store holding `table`.
    pub fn from_table(table: ConfigTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    /// The current table.
    pub fn snapshot(&self) -> Arc<ConfigTable> {
        self.table.load_full()
    }

    /// Replace the table wholesale, returning the previous one.
    pub fn replace(&self, table: ConfigTable) -> Arc<ConfigTable> {
        let workloads = table.len();
        let previous = self.table.swap(Arc::new(table));
        metrics::record_config_loaded(workloads);
        tracing::info!(
            workloads,
            previous_workloads = previous.len(),
            "Configuration table replaced"
        );
        previous
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::WorkloadDescriptor;

    fn table(host: &str) -> ConfigTable {
        let mut table = ConfigTable::new();
        table.insert(
            "workload1".into(),
            WorkloadDescriptor {
                provider: "example".into(),
                host: host.into(),
                kind: "web".into(),
            },
        );
        table
    }

    #[test]
    fn test_starts_empty() {
        assert!(ConfigStore::new().snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = ConfigStore::from_table(table("old.example.com"));
        let before = store.snapshot();

        let previous = store.replace(table("new.example.com"));

        assert_eq!(previous["workload1"].host, "old.example.com");
        assert_eq!(before["workload1"].host, "old.example.com");
        assert_eq!(store.snapshot()["workload1"].host, "new.example.com");
    }

    #[test]
    fn test_concurrent_readers_see_complete_tables() {
        let store = Arc::new(ConfigStore::from_table(ConfigTable::new()));

        let mut full = ConfigTable::new();
        for i in 0..50 {
            full.insert(
                format!("w{i}"),
                WorkloadDescriptor {
                    provider: "example".into(),
                    host: format!("h{i}.example.com"),
                    kind: "web".into(),
                },
            );
        }

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let len = store.snapshot().len();
                        assert!(len == 0 || len == 50, "observed partial table of {len}");
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            store.replace(full.clone());
            store.replace(ConfigTable::new());
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
