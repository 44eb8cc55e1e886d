//! Handler for the internal statistics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of live short links and of users.
///
/// # Endpoint
///
/// `GET /api/internal/stats`
///
/// Reachable only from the trusted subnet, see
/// [`crate::api::middleware::trusted_subnet`].
///
/// # Response
///
/// ```json
/// { "urls": 120, "users": 17 }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.stats().await?;

    Ok(Json(stats.into()))
}
