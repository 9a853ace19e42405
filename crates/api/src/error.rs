//! API error types and handling

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use searchgate_shared::SearchError;
use serde_json::json;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Authentication errors
    #[error("Incorrect username or password")]
    InvalidCredentials,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Upstream errors
    #[error("A service seems to be down, try again later.")]
    ServiceError,
    #[error("Search backend returned an unexpected response")]
    BadGateway,

    // Internal errors
    #[error("Internal server error")]
    Internal,
}

/// Token issuance failures follow the OAuth2 password-flow shape
fn invalid_credentials_response(message: String) -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": message })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::InvalidCredentials => return invalid_credentials_response(self.to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::ServiceError => (StatusCode::INTERNAL_SERVER_ERROR, "SERVICE_ERROR", self.to_string()),
            ApiError::BadGateway => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY", self.to_string()),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", self.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(msg) => ApiError::Validation(msg),
            SearchError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Search backend unavailable");
                ApiError::ServiceError
            }
            SearchError::BadResponse(msg) => {
                tracing::error!(error = %msg, "Search backend returned a bad response");
                ApiError::BadGateway
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
