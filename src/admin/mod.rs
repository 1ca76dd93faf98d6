//! Non-forwarding endpoints: the configuration dump and the catch-all.

pub mod handlers;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::*;

/// `GET /config` plus the catch-all fallback. Workload routes are added on top.
pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_config))
        .fallback(identity_placeholder)
}
