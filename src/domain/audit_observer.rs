//! Observer contract for audit event sinks.

use async_trait::async_trait;

use crate::domain::audit_event::AuditEvent;

/// Errors reported by an observer while delivering an event.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit transport error: {0}")]
    Transport(String),

    #[error("Audit sink returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A sink that receives every published audit event.
///
/// Each registered observer is driven by its own delivery loop, one event at a
/// time, so `notify` may block or fail without affecting other observers or
/// the producers. Failures are logged by the loop and the next event is
/// delivered regardless.
///
/// # Implementations
///
/// - [`crate::infrastructure::audit::FileAuditObserver`] - JSON lines file
/// - [`crate::infrastructure::audit::RemoteAuditObserver`] - HTTP POST sink
#[async_trait]
pub trait AuditObserver: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &str;

    /// Delivers a single event.
    async fn notify(&self, event: &AuditEvent) -> Result<(), AuditError>;
}
