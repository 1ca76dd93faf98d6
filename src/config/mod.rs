//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml
//!     → loader.rs (parse & deserialize settings)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!
//! hosts.yaml (remote)
//!     → source.rs (HTTPS fetch, degrades to empty on failure)
//!     → loader.rs (YAML → ConfigTable)
//!     → store.rs (atomic swap of Arc<ConfigTable>)
//!     → every request reads one snapshot
//! ```
//!
//! # Design Decisions
//! - The workload table is replaced wholesale, never edited in place
//! - A bad workloads document yields an empty table, not an error
//! - Settings have defaults for every field to allow minimal files

pub mod loader;
pub mod schema;
pub mod source;
pub mod store;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{ConfigTable, GatewayConfig, ListenerConfig, WorkloadDescriptor};
pub use source::{reload, ConfigSource, ReloadOutcome};
pub use store::ConfigStore;
