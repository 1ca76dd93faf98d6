//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest + ConfigTable snapshot
//!     → resolver (workload name, remaining path)
//!     → forwarder.rs (table lookup, outbound request derivation)
//!     → upstream.rs (HTTPS call to the workload host)
//!     → http::response::relay (status + body back to the client)
//! ```
//!
//! # Design Decisions
//! - No retries, no fallbacks: one outbound call per request at most
//! - All transport failures collapse into one 500 response
//! - The outbound client sits behind the `Upstream` trait

pub mod error;
pub mod forwarder;
pub mod upstream;

pub use error::ForwardError;
pub use forwarder::Forwarder;
pub use upstream::{HttpUpstream, OutboundRequest, Upstream, UpstreamError, UpstreamResponse};
