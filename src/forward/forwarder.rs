//! Request forwarding.
//!
//! 1. Resolve the workload from the path (400 when there is none)
//! 2. Look it up in the table snapshot (404 when unknown)
//! 3. Derive the outbound request and send it
//! 4. Relay the backend response, or 500 on any transport failure

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header::HOST, HeaderValue, Method},
    response::{IntoResponse, Response},
};

use crate::config::schema::{ConfigTable, WorkloadDescriptor};
use crate::forward::error::ForwardError;
use crate::forward::upstream::{OutboundRequest, Upstream, UpstreamResponse};
use crate::http::request::InboundRequest;
use crate::http::response::relay;
use crate::observability::metrics;
use crate::routing::resolver::{resolve, WorkloadPath};

/// Forwards resolved requests to workload backends.
#[derive(Clone)]
pub struct Forwarder {
    upstream: Arc<dyn Upstream>,
}

impl Forwarder {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Forward `request` against `table` and produce the client response.
    ///
    /// Never fails: every error becomes a response.
    pub async fn forward(&self, request: InboundRequest, table: &ConfigTable) -> Response {
        let start = Instant::now();
        let request_id = request.request_id().to_string();

        let target = match resolve(&request.path) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(request_id = %request_id, path = %request.path, "Invalid request path");
                return ForwardError::from(e).into_response();
            }
        };

        let method = effective_method(request.method.as_ref());
        let response = match self.send(request, &target, table).await {
            Ok(upstream) => relay(upstream),
            Err(e) => {
                match &e {
                    ForwardError::WorkloadNotFound(_) => {
                        tracing::warn!(request_id = %request_id, workload = %target.workload, "Workload not found");
                    }
                    _ => {
                        tracing::error!(request_id = %request_id, workload = %target.workload, error = %e, "Error forwarding request");
                    }
                }
                e.into_response()
            }
        };

        metrics::record_forward(
            &target.workload,
            method.as_str(),
            response.status().as_u16(),
            start,
        );
        response
    }

    async fn send(
        &self,
        request: InboundRequest,
        target: &WorkloadPath,
        table: &ConfigTable,
    ) -> Result<UpstreamResponse, ForwardError> {
        let descriptor = table
            .get(&target.workload)
            .ok_or_else(|| ForwardError::WorkloadNotFound(target.workload.clone()))?;

        let outbound = build_outbound(request, descriptor, &target.remaining)?;
        tracing::info!(
            method = %outbound.method,
            url = %outbound.url,
            "Forwarding request"
        );

        Ok(self.upstream.send(outbound).await?)
    }
}

/// The inbound method, or `GET` when none was given.
pub fn effective_method(method: Option<&Method>) -> Method {
    match method {
        Some(method) => method.clone(),
        None => Method::GET,
    }
}

/// Only POST, PUT and PATCH carry a forwarded body.
pub fn carries_body(method: &Method) -> bool {
    ["POST", "PUT", "PATCH"]
        .iter()
        .any(|m| method.as_str().eq_ignore_ascii_case(m))
}

/// `https://{host}[/{remaining}][?{query}]`.
pub fn target_url(host: &str, remaining: &str, query: &[(String, String)]) -> String {
    let mut url = format!("https://{host}");
    if !remaining.is_empty() {
        url.push('/');
        url.push_str(remaining);
    }
    if !query.is_empty() {
        let pairs: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    url
}

/// Derive the backend request from an inbound request and its workload.
///
/// Headers are copied as received, so a client `content-length` still goes
/// out when the body is dropped for GET or DELETE.
pub fn build_outbound(
    request: InboundRequest,
    descriptor: &WorkloadDescriptor,
    remaining: &str,
) -> Result<OutboundRequest, ForwardError> {
    let method = effective_method(request.method.as_ref());
    let url = target_url(&descriptor.host, remaining, &request.query);

    let mut headers = request.headers;
    let host = HeaderValue::from_str(&descriptor.host)
        .map_err(|_| ForwardError::InvalidHost(descriptor.host.clone()))?;
    headers.insert(HOST, host);

    let body = if carries_body(&method) {
        Some(request.body)
    } else {
        None
    };

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
    })
}
