//! Caller identity middleware.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::error::AppError;

/// Header carrying the authenticated user id, set by the fronting proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller, available to handlers as `Extension<OwnerId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub i64);

/// Resolves the caller from the `X-User-Id` header.
///
/// Authentication happens upstream; this layer only trusts and parses the
/// forwarded id.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or not an integer.
///
/// # Example
///
/// ```rust,ignore
/// let user_routes = Router::new()
///     .route("/user/urls", get(user_links_handler))
///     .route_layer(middleware::from_fn(identity::layer));
/// ```
pub async fn layer(mut req: Request, next: Next) -> Result<Response, AppError> {
    let owner = owner_from_headers(req.headers())?;
    req.extensions_mut().insert(owner);

    Ok(next.run(req).await)
}

fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, AppError> {
    let value = headers.get(USER_ID_HEADER).ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "X-User-Id header is missing" }),
        )
    })?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(OwnerId)
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "X-User-Id header is not a valid user id" }),
            )
        })
}
