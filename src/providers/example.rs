//! The `example` provider: generic pass-through forwarding.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;

use crate::config::ConfigStore;
use crate::forward::Forwarder;
use crate::http::request::InboundRequest;
use crate::providers::Provider;

/// Forwards every request using the live configuration table.
pub struct ExampleProvider {
    store: Arc<ConfigStore>,
    forwarder: Forwarder,
}

impl ExampleProvider {
    pub const NAME: &'static str = "example";

    pub fn new(store: Arc<ConfigStore>, forwarder: Forwarder) -> Self {
        Self { store, forwarder }
    }
}

#[async_trait]
impl Provider for ExampleProvider {
    async fn handle(&self, request: InboundRequest) -> Response {
        // One snapshot for the whole request.
        let table = self.store.snapshot();
        self.forwarder.forward(request, &table).await
    }
}
