//! Health check handler.

use axum::Json;
use mediaprobe_core::models::HealthResponse;

pub const HEALTH_STATUS: &str = "API is up and running";

#[utoipa::path(
    get,
    path = "/health/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
    })
}
