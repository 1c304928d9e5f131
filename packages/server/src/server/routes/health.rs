use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
}

/// Readiness check. The pipeline keeps no connections open, so there is
/// nothing to check beyond the process answering.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
