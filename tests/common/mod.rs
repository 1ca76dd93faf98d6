//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use workload_gateway::config::{ConfigStore, ConfigTable, GatewayConfig, WorkloadDescriptor};
use workload_gateway::forward::{Forwarder, OutboundRequest, Upstream, UpstreamError, UpstreamResponse};
use workload_gateway::http::HttpServer;
use workload_gateway::lifecycle::Shutdown;
use workload_gateway::providers::ProviderRegistry;

/// Upstream that records requests and answers from a closure.
pub struct MockUpstream<F> {
    pub requests: Mutex<Vec<OutboundRequest>>,
    respond: F,
}

impl<F> MockUpstream<F>
where
    F: Fn(&OutboundRequest) -> Result<(u16, &'static str, &'static str), String> + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            respond,
        }
    }

    pub fn recorded(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> Upstream for MockUpstream<F>
where
    F: Fn(&OutboundRequest) -> Result<(u16, &'static str, &'static str), String> + Send + Sync,
{
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let result = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);

        let (status, content_type, body) = result.map_err(UpstreamError::Other)?;
        let mut headers = HeaderMap::new();
        headers.insert("content-type", content_type.parse().unwrap());
        Ok(UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from_static(body.as_bytes()),
        })
    }
}

pub fn workload(provider: &str, host: &str) -> WorkloadDescriptor {
    WorkloadDescriptor {
        provider: provider.into(),
        host: host.into(),
        kind: "web".into(),
    }
}

/// A running gateway on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub store: Arc<ConfigStore>,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway serving `table`, forwarding through `upstream`.
pub async fn start_gateway(table: ConfigTable, upstream: Arc<dyn Upstream>) -> TestGateway {
    let store = Arc::new(ConfigStore::from_table(table));
    let registry = ProviderRegistry::builtin(store.clone(), Forwarder::new(upstream));
    let server = HttpServer::new(GatewayConfig::default(), store.clone(), &registry);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        addr,
        store,
        shutdown,
    }
}

/// Start a bare HTTP/1.1 server that answers every request with `status` and `body`.
pub async fn start_document_server(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/yaml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
