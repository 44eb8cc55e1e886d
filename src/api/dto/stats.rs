//! DTOs for the internal statistics endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::LinkStats;

/// Body of `GET /api/internal/stats`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub urls: i64,
    pub users: i64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            urls: stats.urls,
            users: stats.users,
        }
    }
}
