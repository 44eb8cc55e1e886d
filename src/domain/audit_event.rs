//! Audit event model for the fan-out publisher.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Action recorded when a user shortens a URL.
pub const ACTION_SHORTEN: &str = "shorten";

/// An immutable record of a user action.
///
/// # Wire Format
///
/// Downstream consumers expect the owner rendered as a string:
///
/// ```json
/// {"ts": 1700000000, "action": "shorten", "user_id": "42", "url": "https://example.com"}
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unix seconds.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub action: String,
    #[serde(rename = "user_id")]
    #[serde_as(as = "DisplayFromStr")]
    pub owner_id: i64,
    pub url: String,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    pub fn new(action: impl Into<String>, owner_id: i64, url: impl Into<String>) -> Self {
        Self::at(Utc::now().timestamp(), action, owner_id, url)
    }

    /// Creates an event with an explicit timestamp.
    pub fn at(
        timestamp: i64,
        action: impl Into<String>,
        owner_id: i64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            action: action.into(),
            owner_id,
            url: url.into(),
        }
    }

    pub fn shorten(owner_id: i64, url: impl Into<String>) -> Self {
        Self::new(ACTION_SHORTEN, owner_id, url)
    }
}
