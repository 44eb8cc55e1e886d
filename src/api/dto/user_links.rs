//! DTOs for the per-user link endpoints.

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/user/urls`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserLinkItem {
    pub short_url: String,
    pub original_url: String,
}

/// Body of `DELETE /api/user/urls`: a bare JSON array of short codes.
pub type DeleteLinksRequest = Vec<String>;
