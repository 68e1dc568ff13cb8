//! Health check endpoint

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// GET /health - Process liveness with the current server time
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
