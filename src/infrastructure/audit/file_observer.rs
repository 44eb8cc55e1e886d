//! JSON lines audit log on the local filesystem.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_observer::{AuditError, AuditObserver};

/// Appends one JSON object per line to `path`.
///
/// The file is opened for every event, so it may be rotated or removed while
/// the service runs; a missing file is recreated on the next event.
pub struct FileAuditObserver {
    path: PathBuf,
}

impl FileAuditObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditObserver for FileAuditObserver {
    fn name(&self) -> &str {
        "file"
    }

    async fn notify(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }
}
