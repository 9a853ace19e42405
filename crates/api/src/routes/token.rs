//! Token issuance endpoint

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, PRAGMA},
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthError,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Floor on response time so failure paths cannot be told apart by latency
const MIN_RESPONSE_TIME: Duration = Duration::from_millis(200);

/// OAuth2 password-flow form; other form fields are ignored
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /login_for_access_token
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(req): Form<TokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let start = Instant::now();

    let result = issue_token(&state, req).await;

    let elapsed = start.elapsed();
    if elapsed < MIN_RESPONSE_TIME {
        tokio::time::sleep(MIN_RESPONSE_TIME - elapsed).await;
    }

    let access_token = result?;
    Ok((
        [(CACHE_CONTROL, "no-store"), (PRAGMA, "no-cache")],
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// Password hashing is CPU-bound, so it runs off the async workers
async fn issue_token(state: &AppState, req: TokenRequest) -> ApiResult<String> {
    let authenticator = state.authenticator.clone();
    let TokenRequest { username, password } = req;

    tokio::task::spawn_blocking(move || authenticator.issue(&username, &password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "login: token issuance task failed");
            ApiError::Internal
        })?
        .map_err(|e| match e {
            AuthError::Failed(_) => ApiError::InvalidCredentials,
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "login: token issuance failed");
                ApiError::Internal
            }
        })
}
