//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`audit`] - Audit observers writing to a file or a remote collector
//! - [`persistence`] - Link storage (PostgreSQL and in-memory)

pub mod audit;
pub mod persistence;
