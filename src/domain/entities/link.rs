//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by a single user.
///
/// Links are never physically removed. Deletion flips `deleted`, after which
/// redirects for the code answer `410 Gone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        owner_id: i64,
        created_at: DateTime<Utc>,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            owner_id,
            created_at,
            deleted,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns true if `owner_id` created this link.
    pub fn is_owned_by(&self, owner_id: i64) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub owner_id: i64,
}

/// Service-wide counters reported to trusted callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Live (not deleted) links.
    pub urls: i64,
    /// Distinct owners that ever shortened a URL.
    pub users: i64,
}
