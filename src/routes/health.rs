use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe. GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
