//! Application layer: business services and the background pipelines.
//!
//! # Modules
//!
//! - [`services`] - Request-facing business logic consumed by HTTP handlers
//! - [`deletion_aggregator`] - Batched asynchronous soft-deletion
//! - [`audit_publisher`] - Fan-out of audit events to observers
//! - [`lifecycle`] - Stop signal and task tracking shared by both pipelines

pub mod audit_publisher;
pub mod deletion_aggregator;
pub mod lifecycle;
pub mod services;

pub use audit_publisher::{AuditConfig, AuditPublisher};
pub use deletion_aggregator::{DeletionAggregator, DeletionConfig};
