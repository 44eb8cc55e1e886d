//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be HTTP/HTTPS).
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

/// Short URL issued for the request, or the existing one on conflict.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}

/// One entry of a `POST /api/shorten/batch` body.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchShortenItem {
    /// Caller-chosen id echoed back in the response.
    #[validate(length(min = 1, max = 128))]
    pub correlation_id: String,

    #[validate(length(min = 1, max = 2048))]
    pub original_url: String,
}

/// Short URL issued for one batch entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchShortenResult {
    pub correlation_id: String,
    pub short_url: String,
}
