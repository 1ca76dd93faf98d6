//! Handlers for `/config` and the unmatched-path placeholder.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::ConfigTable;
use crate::http::server::AppState;

/// Placeholder identity payload served for unmapped paths.
#[derive(Debug, Serialize)]
pub struct IdentitySummary {
    pub user: &'static str,
    pub history: [&'static str; 2],
}

/// `GET /config`: the live workload table.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigTable> {
    let table = state.store.snapshot();
    Json(table.as_ref().clone())
}

/// Catch-all for any path without a workload route.
pub async fn identity_placeholder() -> Json<IdentitySummary> {
    Json(IdentitySummary {
        user: "unknown user",
        history: [
            "insert identity history0 here",
            "insert identity history1 here",
        ],
    })
}
