//! Backend response relaying.
//!
//! Status and body are passed through untouched. `content-type` travels with
//! the body so JSON stays JSON; no other backend header is relayed.

use axum::{
    body::Body,
    http::header::CONTENT_TYPE,
    response::Response,
};

use crate::forward::upstream::UpstreamResponse;

/// Turn a buffered backend response into the client response.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    if let Some(content_type) = upstream.headers.get(CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, content_type.clone());
    }
    response
}
