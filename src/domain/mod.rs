//! Domain layer containing business entities and contracts.
//!
//! Defines entities, repository interfaces, and the message types that flow
//! through the background pipelines, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`delete_task`] - Deletion request consumed by the batching pipeline
//! - [`audit_event`] - Audit record fanned out to observers
//! - [`audit_observer`] - Observer contract for audit sinks
//!
//! # Deletion Flow
//!
//! 1. HTTP handler receives a bulk delete request
//! 2. A [`delete_task::DeleteTask`] is queued on the deletion aggregator
//! 3. Tasks are merged per owner and flushed on size or interval
//! 4. Delete workers call [`repositories::LinkRepository::delete_batch`]

pub mod audit_event;
pub mod audit_observer;
pub mod delete_task;
pub mod entities;
pub mod repositories;
