//! Inbound request capture.
//!
//! # Responsibilities
//! - Buffer the body up to the configured limit
//! - Decode the query string into ordered, multi-valued pairs
//! - Keep method, path and headers exactly as received
//!
//! # Design Decisions
//! - The original request is consumed; forwarding builds a fresh outbound request
//! - Method is optional so a missing method can fall back explicitly

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request},
};
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::forward::ForwardError;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An inbound request as seen by the forwarding core.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Option<Method>,
    /// Full original path, including the workload segment.
    pub path: String,
    /// Decoded query pairs, one entry per occurrence.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// A bodiless request with no query or headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Capture an axum request, buffering at most `body_limit` bytes of body.
    pub async fn capture(request: Request<Body>, body_limit: usize) -> Result<Self, ForwardError> {
        let (parts, body) = request.into_parts();
        let body = Limited::new(body, body_limit)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    ForwardError::BodyTooLarge(body_limit)
                } else {
                    ForwardError::BodyRead(e.to_string())
                }
            })?
            .to_bytes();

        Ok(Self {
            method: Some(parts.method),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(parse_query).unwrap_or_default(),
            headers: parts.headers,
            body,
        })
    }

    /// The request's correlation id, if the request-id layer assigned one.
    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Decode a raw query string into `(key, value)` pairs in order of appearance.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}
