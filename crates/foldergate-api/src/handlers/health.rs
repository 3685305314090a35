//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/detailed
pub async fn detailed_health(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let backends = state.registry.health_check_all().await;
    let status = if backends.values().all(|healthy| *healthy) {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        backends,
    }))
}
