//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Implementations are shared by every request handler and every delete
/// worker, so they must be safe for concurrent use.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code exists or a live link
    /// already has the long URL.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, including soft-deleted links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the live link for an original long URL.
    ///
    /// Used to detect URLs that were already shortened. Deleted links are
    /// skipped, so a URL whose link was deleted can be shortened again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError>;

    /// Lists the owner's links that are not deleted, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Soft-deletes `codes`, touching only links owned by `owner_id`.
    ///
    /// Unknown codes and codes belonging to other owners are ignored, so
    /// repeating a call is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_batch(&self, owner_id: i64, codes: Vec<String>) -> Result<(), AppError>;

    /// Counts live links and distinct owners.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn stats(&self) -> Result<LinkStats, AppError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> bool;
}
