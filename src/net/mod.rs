//! Network layer.
//!
//! Plain TCP listeners come straight from tokio; this module only adds the
//! optional TLS termination for the gateway listener.

pub mod tls;
