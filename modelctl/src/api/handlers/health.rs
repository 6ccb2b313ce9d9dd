//! Liveness endpoint, mounted outside the authenticated API.

use axum::Json;
use serde_json::{Value, json};

/// Report service liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check",
    description = "Returns 200 when the service is up. Requires no authentication.",
    responses(
        (status = 200, description = "Service is healthy"),
    )
)]
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
