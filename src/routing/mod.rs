//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     ConfigTable + ProviderRegistry
//!     → registrar.rs (plan: verbs × paths per workload)
//!     → axum Router with one handler per workload
//!
//! Incoming Request (path)
//!     → resolver.rs (workload name, remaining path)
//!     → forwarding
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Resolution drops empty path segments
//! - Unknown providers skip the workload, never fail startup

pub mod registrar;
pub mod resolver;

pub use registrar::{plan_routes, register_routes, RouteBinding, RoutePlan};
pub use resolver::{resolve, InvalidPath, WorkloadPath};
