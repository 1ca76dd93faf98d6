//! Provider strategies.
//!
//! A workload descriptor names its provider; the registry maps that name to a
//! handler. Lookup is an exact string match with no default, so a misspelt
//! provider leaves its workload unrouted.

pub mod example;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;

use crate::config::ConfigStore;
use crate::forward::Forwarder;
use crate::http::request::InboundRequest;

pub use example::ExampleProvider;

/// A request-handling strategy bound to workload routes.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn handle(&self, request: InboundRequest) -> Response;
}

/// Named providers available to the route registrar.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in providers: `example`, a plain forwarder over the live table.
    pub fn builtin(store: Arc<ConfigStore>, forwarder: Forwarder) -> Self {
        let mut registry = Self::new();
        registry.register(
            ExampleProvider::NAME,
            Arc::new(ExampleProvider::new(store, forwarder)),
        );
        registry
    }

    /// Add or replace a provider, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) -> Option<Arc<dyn Provider>> {
        self.providers.insert(name.into(), provider)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::upstream::testing::RecordingUpstream;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::builtin(
            Arc::new(ConfigStore::new()),
            Forwarder::new(Arc::new(RecordingUpstream::new())),
        )
    }

    #[test]
    fn test_builtin_has_example() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["example"]);
        assert!(registry.get("example").is_some());
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = registry();
        assert!(registry.get("Example").is_none());
        assert!(registry.get("example ").is_none());
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_register_extends_registry() {
        let mut registry = registry();
        let forwarder = Forwarder::new(Arc::new(RecordingUpstream::new()));
        let replaced = registry.register(
            "googlecloud",
            Arc::new(ExampleProvider::new(Arc::new(ConfigStore::new()), forwarder)),
        );
        assert!(replaced.is_none());
        assert_eq!(registry.names(), vec!["example", "googlecloud"]);
    }
}
