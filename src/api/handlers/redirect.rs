//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_code;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has been deleted by its owner.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    if !is_code(&code) {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ));
    }

    let link = state.link_service.resolve(&code).await?;

    Ok(Redirect::temporary(&link.long_url))
}
