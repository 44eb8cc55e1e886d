//! Access control for internal endpoints.

use std::net::IpAddr;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use sqlx::types::ipnetwork::IpNetwork;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the client address, set by the fronting proxy.
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Admits only clients whose `X-Real-IP` lies in the trusted subnet.
///
/// With no subnet configured every request is refused.
///
/// # Errors
///
/// Returns `403 Forbidden` if no subnet is configured, the header is missing
/// or malformed, or the address is outside the subnet.
///
/// # Example
///
/// ```rust,ignore
/// let internal = Router::new()
///     .route("/internal/stats", get(stats_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), trusted_subnet::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_client(state.trusted_subnet.as_ref(), req.headers())?;

    Ok(next.run(req).await)
}

fn check_client(subnet: Option<&IpNetwork>, headers: &HeaderMap) -> Result<(), AppError> {
    let subnet = subnet.ok_or_else(|| forbidden("Trusted subnet is not configured"))?;

    let ip = headers
        .get(REAL_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .ok_or_else(|| forbidden("X-Real-IP header is missing or invalid"))?;

    if !subnet.contains(ip) {
        return Err(forbidden("Client is outside the trusted subnet"));
    }

    Ok(())
}

fn forbidden(reason: &str) -> AppError {
    AppError::forbidden("Forbidden", json!({ "reason": reason }))
}
