//! Handlers for the caller's own links.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::user_links::{DeleteLinksRequest, UserLinkItem};
use crate::api::middleware::OwnerId;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_code;

/// Lists the caller's live links.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response
///
/// - **200 OK** with `[{"short_url": "...", "original_url": "..."}]`
/// - **204 No Content** when the caller has no links
pub async fn user_links_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
) -> Result<Response, AppError> {
    let links = state.link_service.list_user_links(owner_id).await?;

    if links.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let items: Vec<UserLinkItem> = links
        .into_iter()
        .map(|link| UserLinkItem {
            short_url: state.link_service.short_url(&link.code),
            original_url: link.long_url,
        })
        .collect();

    Ok(Json(items).into_response())
}

/// Schedules deletion of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/user/urls`
///
/// # Request Body
///
/// ```json
/// ["abc123def456", "zyx987wvu654"]
/// ```
///
/// # Response
///
/// **202 Accepted** as soon as the request is queued. Links are deleted in
/// the background; codes that belong to other users are ignored.
///
/// # Errors
///
/// Returns 400 Bad Request for malformed codes.
/// Returns 503 Service Unavailable while the service is shutting down.
pub async fn delete_user_links_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    Json(codes): Json<DeleteLinksRequest>,
) -> Result<StatusCode, AppError> {
    let invalid: Vec<&String> = codes.iter().filter(|code| !is_code(code)).collect();
    if !invalid.is_empty() {
        return Err(AppError::bad_request(
            "Invalid short codes",
            json!({ "codes": invalid }),
        ));
    }

    state.link_service.delete_user_links(owner_id, codes).await?;

    Ok(StatusCode::ACCEPTED)
}
