//! Audit observers shipped with the service.
//!
//! - [`FileAuditObserver`] - appends JSON lines to a local file
//! - [`RemoteAuditObserver`] - POSTs each event to an HTTP collector

pub mod file_observer;
pub mod remote_observer;

pub use file_observer::FileAuditObserver;
pub use remote_observer::RemoteAuditObserver;
