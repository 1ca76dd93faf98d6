//! Workload route registration.
//!
//! Every usable workload gets:
//! ```text
//! GET    /{name}
//! GET    /{name}/*
//! POST   /{name}/*
//! PUT    /{name}/*
//! DELETE /{name}/*
//! PATCH  /{name}/*
//! ```
//! all bound to the provider its descriptor names. The wildcard verbs are also
//! served on `/{name}/`, since `{*rest}` never matches an empty remainder.
//! Workloads whose provider is not registered, or which fail validation, are
//! skipped and logged.
//!
//! Planning is separate from registration so the plan can be inspected
//! without building a router.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::Method,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};

use crate::config::schema::ConfigTable;
use crate::config::validation::{validate_workload, WorkloadIssue};
use crate::http::request::InboundRequest;
use crate::providers::{Provider, ProviderRegistry};

/// Methods registered on the wildcard route of every workload.
pub const WILDCARD_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// One verb + path pair bound to a workload's provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    pub method: Method,
    /// `/{name}` or `/{name}/*`.
    pub path: String,
    pub workload: String,
    pub provider: String,
}

impl RouteBinding {
    /// The path in axum's route syntax.
    pub fn router_path(&self) -> String {
        match self.path.strip_suffix("/*") {
            Some(prefix) => format!("{prefix}/{{*rest}}"),
            None => self.path.clone(),
        }
    }

    /// Every axum path this binding is served on. A wildcard binding also
    /// covers `/{name}/`, which `{*rest}` does not match.
    pub fn router_paths(&self) -> Vec<String> {
        match self.path.strip_suffix('*') {
            Some(with_slash) => vec![self.router_path(), with_slash.to_string()],
            None => vec![self.path.clone()],
        }
    }
}

/// Why a workload got no routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingProvider { provider: String },
    Invalid(WorkloadIssue),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingProvider { provider } => write!(f, "provider '{provider}' not found"),
            SkipReason::Invalid(issue) => write!(f, "{issue}"),
        }
    }
}

/// The routes a table produces against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    pub bindings: Vec<RouteBinding>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl RoutePlan {
    /// Names of workloads that received routes, in table order.
    pub fn routed_workloads(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.iter().map(|b| b.workload.as_str()).collect();
        names.dedup();
        names
    }
}

/// Work out which routes `table` yields, logging every skipped workload.
pub fn plan_routes(table: &ConfigTable, registry: &ProviderRegistry) -> RoutePlan {
    let mut plan = RoutePlan::default();

    for (name, descriptor) in table {
        if registry.get(&descriptor.provider).is_none() {
            tracing::error!(
                "Provider '{}' not found for workload: {}",
                descriptor.provider,
                name
            );
            plan.skipped.push((
                name.clone(),
                SkipReason::MissingProvider {
                    provider: descriptor.provider.clone(),
                },
            ));
            continue;
        }

        if let Err(issue) = validate_workload(name, descriptor) {
            tracing::error!(workload = %name, error = %issue, "Skipping workload");
            plan.skipped.push((name.clone(), SkipReason::Invalid(issue)));
            continue;
        }

        let bind = |method: Method, path: String| RouteBinding {
            method,
            path,
            workload: name.clone(),
            provider: descriptor.provider.clone(),
        };
        plan.bindings.push(bind(Method::GET, format!("/{name}")));
        for method in WILDCARD_METHODS {
            plan.bindings.push(bind(method, format!("/{name}/*")));
        }
    }

    plan
}

/// Add the routes for every usable workload in `table` to `router`.
///
/// Request bodies are buffered up to `body_limit` bytes before reaching the
/// provider. Registering the same table twice on one router is a caller error
/// (axum rejects overlapping routes).
pub fn register_routes<S>(
    router: Router<S>,
    table: &ConfigTable,
    registry: &ProviderRegistry,
    body_limit: usize,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let plan = plan_routes(table, registry);

    let mut routes: BTreeMap<String, MethodRouter<S>> = BTreeMap::new();
    for binding in &plan.bindings {
        let (Some(provider), Some(filter)) =
            (registry.get(&binding.provider), method_filter(&binding.method))
        else {
            continue;
        };

        let handler = move |request: Request| {
            let provider = provider.clone();
            async move { dispatch(provider, request, body_limit).await }
        };

        for path in binding.router_paths() {
            let method_router = routes.remove(&path).unwrap_or_else(MethodRouter::new);
            routes.insert(path, method_router.on(filter, handler.clone()));
        }
    }

    for workload in plan.routed_workloads() {
        tracing::info!(workload = %workload, "Registered workload routes");
    }

    routes
        .into_iter()
        .fold(router, |router, (path, method_router)| router.route(&path, method_router))
}

fn method_filter(method: &Method) -> Option<MethodFilter> {
    match method {
        &Method::GET => Some(MethodFilter::GET),
        &Method::POST => Some(MethodFilter::POST),
        &Method::PUT => Some(MethodFilter::PUT),
        &Method::DELETE => Some(MethodFilter::DELETE),
        &Method::PATCH => Some(MethodFilter::PATCH),
        _ => None,
    }
}

async fn dispatch(provider: Arc<dyn Provider>, request: Request, body_limit: usize) -> Response {
    match InboundRequest::capture(request, body_limit).await {
        Ok(inbound) => provider.handle(inbound).await,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting request");
            e.into_response()
        }
    }
}
