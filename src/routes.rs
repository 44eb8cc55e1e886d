//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /`                   - Plain-text shortening (`X-User-Id` required)
//! - `GET  /{code}`             - Short link redirect (public)
//! - `GET  /health`             - Health check: storage and both pipelines (public)
//! - `/api/internal/*`          - Operational endpoints (trusted subnet only)
//! - `/api/*`                   - REST API (`X-User-Id` required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Identity** - Caller id from the `X-User-Id` header (user endpoints)
//! - **Trusted subnet** - `X-Real-IP` checked against `TRUSTED_SUBNET` (internal endpoints)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, shorten_text_handler};
use crate::api::middleware::{identity, tracing, trusted_subnet};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    let user_api =
        api::routes::user_routes().route_layer(middleware::from_fn(identity::layer));
    let internal_api = api::routes::internal_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), trusted_subnet::layer),
    );

    Router::new()
        .route(
            "/",
            post(shorten_text_handler).route_layer(middleware::from_fn(identity::layer)),
        )
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", user_api.merge(internal_api))
        .with_state(state)
        .layer(tracing::layer())
}
