//! HTTP middleware for request processing.
//!
//! Provides caller identity resolution, trusted-subnet access control and
//! observability middleware.

pub mod identity;
pub mod tracing;
pub mod trusted_subnet;

pub use identity::OwnerId;
