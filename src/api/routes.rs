//! API route configuration.
//!
//! User endpoints act on behalf of the caller identified by
//! [`crate::api::middleware::identity`]. Internal endpoints are guarded by
//! [`crate::api::middleware::trusted_subnet`] instead.

use crate::api::handlers::{
    delete_user_links_handler, shorten_batch_handler, shorten_handler, stats_handler,
    user_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// API routes scoped to the calling user.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Shorten a URL
/// - `POST   /shorten/batch`  - Shorten several URLs
/// - `GET    /user/urls`      - List the caller's links
/// - `DELETE /user/urls`      - Queue deletion of the caller's links
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(shorten_batch_handler))
        .route(
            "/user/urls",
            get(user_links_handler).delete(delete_user_links_handler),
        )
}

/// Operational routes for trusted clients.
///
/// # Endpoints
///
/// - `GET /internal/stats` - Link and user counters
pub fn internal_routes() -> Router<AppState> {
    Router::new().route("/internal/stats", get(stats_handler))
}
