//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Storage unreachable or a pipeline stopped
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable" },
///     "deletion_queue": { "status": "ok", "message": "Free slots: 100" },
///     "audit_queue": { "status": "ok", "message": "Free slots: 100" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = if state.link_repository.health_check().await {
        CheckStatus::ok("Reachable")
    } else {
        CheckStatus::error("Storage is unreachable")
    };

    let deletion_queue = if state.deletions.is_stopped() {
        CheckStatus::error("Deletion pipeline is stopped")
    } else {
        CheckStatus::ok(format!(
            "Free slots: {}",
            state.deletions.available_capacity()
        ))
    };

    let audit_queue = if state.audit.is_stopped() {
        CheckStatus::error("Audit pipeline is stopped")
    } else {
        CheckStatus::ok(format!("Free slots: {}", state.audit.available_capacity()))
    };

    let all_healthy = storage.is_ok() && deletion_queue.is_ok() && audit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            deletion_queue,
            audit_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
