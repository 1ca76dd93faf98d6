//! Forwarding errors and their client-facing responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::forward::upstream::UpstreamError;
use crate::routing::resolver::InvalidPath;

/// Body sent to the client for every backend-call failure.
pub const FORWARDING_FAILED: &str = "Error forwarding request to remote host";

/// Everything that can stop a request from being relayed.
///
/// Backend failures all collapse to the same 500 body; the detail only goes
/// to the log.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    #[error("Workload {0} not found")]
    WorkloadNotFound(String),

    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("Request body could not be read: {0}")]
    BodyRead(String),

    #[error("Invalid backend host '{0}'")]
    InvalidHost(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ForwardError::WorkloadNotFound(_) => StatusCode::NOT_FOUND,
            ForwardError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ForwardError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ForwardError::InvalidHost(_) | ForwardError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ForwardError::InvalidPath(_) | ForwardError::WorkloadNotFound(_) => self.to_string(),
            ForwardError::BodyTooLarge(_) => "Request body too large".to_string(),
            ForwardError::BodyRead(_) => "Invalid request body".to_string(),
            ForwardError::InvalidHost(_) | ForwardError::Upstream(_) => FORWARDING_FAILED.to_string(),
        };
        (status, body).into_response()
    }
}
