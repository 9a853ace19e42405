//! Health check endpoints

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Search service healthcheck
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "OK".to_string(),
    })
}

/// Liveness probe (just returns 200 if the server is running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn root() -> &'static str {
    "Server is serving..."
}
