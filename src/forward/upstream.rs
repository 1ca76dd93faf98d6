//! Outbound HTTP calls to workload backends.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use thiserror::Error;

/// A fully derived request for a workload backend.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// `None` means no body is sent at all.
    pub body: Option<Bytes>,
}

/// A buffered backend response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure talking to a backend.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Sends outbound requests.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// `reqwest`-backed upstream. Uses the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording upstream for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records every request and replays queued results in order.
    /// Falls back to `200 OK` with an empty body once the queue is drained.
    #[derive(Default)]
    pub struct RecordingUpstream {
        pub requests: Mutex<Vec<OutboundRequest>>,
        results: Mutex<VecDeque<Result<UpstreamResponse, String>>>,
    }

    impl RecordingUpstream {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, content_type: Option<&str>, body: &str) -> Self {
            let mut headers = HeaderMap::new();
            if let Some(ct) = content_type {
                headers.insert("content-type", ct.parse().unwrap());
            }
            self.results.lock().unwrap().push_back(Ok(UpstreamResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers,
                body: Bytes::from(body.to_string()),
            }));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.results.lock().unwrap().push_back(Err(message.to_string()));
            self
        }

        pub fn recorded(&self) -> Vec<OutboundRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for RecordingUpstream {
        async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
            self.requests.lock().unwrap().push(request);
            match self.results.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(UpstreamError::Other(message)),
                None => Ok(UpstreamResponse {
                    status: StatusCode::OK,
                    headers: HeaderMap::new(),
                    body: Bytes::new(),
                }),
            }
        }
    }
}
