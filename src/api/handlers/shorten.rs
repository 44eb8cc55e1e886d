//! Handlers for link shortening endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{
    BatchShortenItem, BatchShortenResult, ShortenRequest, ShortenResponse,
};
use crate::api::middleware::OwnerId;
use crate::application::services::Shortened;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// - **201 Created** with `{"result": "<short url>"}` for a new link
/// - **409 Conflict** with the same body carrying the existing short URL when
///   the URL was shortened before
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or not HTTP(S).
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let outcome = state.link_service.shorten(owner_id, &payload.url).await?;

    let status = match outcome {
        Shortened::Created(_) => StatusCode::CREATED,
        Shortened::Existing(_) => StatusCode::CONFLICT,
    };
    let result = state.link_service.short_url(&outcome.link().code);

    Ok((status, Json(ShortenResponse { result })))
}

/// Creates a short URL from a plain-text body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Request Body
///
/// The long URL as `text/plain`.
///
/// # Response
///
/// - **201 Created** with the short URL as plain text
/// - **409 Conflict** with the existing short URL when the URL was shortened
///   before
///
/// # Errors
///
/// Returns 400 Bad Request if the body is empty or not an HTTP(S) URL.
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    body: String,
) -> Result<(StatusCode, String), AppError> {
    let long_url = body.trim();
    if long_url.is_empty() {
        return Err(AppError::bad_request(
            "Request body must contain a URL",
            json!({}),
        ));
    }

    let outcome = state.link_service.shorten(owner_id, long_url).await?;

    let status = match outcome {
        Shortened::Created(_) => StatusCode::CREATED,
        Shortened::Existing(_) => StatusCode::CONFLICT,
    };

    Ok((status, state.link_service.short_url(&outcome.link().code)))
}

/// Creates short URLs for a batch of long URLs.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [
///   { "correlation_id": "1", "original_url": "https://example.com/a" },
///   { "correlation_id": "2", "original_url": "https://example.com/b" }
/// ]
/// ```
///
/// # Response
///
/// **201 Created** with one `{"correlation_id", "short_url"}` per entry, in
/// request order. URLs shortened before get their existing short URL.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty batch or if any entry is invalid;
/// nothing is stored in that case.
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    Json(items): Json<Vec<BatchShortenItem>>,
) -> Result<(StatusCode, Json<Vec<BatchShortenResult>>), AppError> {
    for item in &items {
        item.validate()?;
    }

    let long_urls: Vec<String> = items.iter().map(|item| item.original_url.clone()).collect();
    let outcomes = state.link_service.shorten_batch(owner_id, &long_urls).await?;

    let results = items
        .into_iter()
        .zip(outcomes)
        .map(|(item, outcome)| BatchShortenResult {
            correlation_id: item.correlation_id,
            short_url: state.link_service.short_url(&outcome.link().code),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(results)))
}
