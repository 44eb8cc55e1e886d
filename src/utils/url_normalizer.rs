//! Canonical form for URLs submitted for shortening.
//!
//! Two submissions that differ only in host case, default port or fragment map
//! to the same stored URL, so deduplication sees them as one.

use url::Url;

/// Longest URL accepted for shortening.
pub const MAX_URL_LEN: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LEN} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Only HTTP and HTTPS are allowed, and a host is required
/// 3. Hostname is lowercased and default ports are dropped
/// 4. Fragments are removed
/// 5. Path and query are kept as-is
///
/// # Errors
///
/// Returns an [`UrlNormalizationError`] describing the first rule violated.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if input.len() > MAX_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    // The parser lowercases the host and strips default ports itself.
    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url.to_string())
}
