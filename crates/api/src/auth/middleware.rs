//! Request authorization middleware
//!
//! Every request passes through [`require_auth`]. Each one ends up in one of
//! two terminal states: allowed through to its handler, or rejected with a
//! 401 whose body is a bare JSON string.
//!
//! Policy:
//! - `GET` and `OPTIONS` requests are exempt. Read-style and preflight
//!   traffic is never checked.
//! - The token issuance path is exempt, since a client cannot present a
//!   token it does not have yet.
//! - Everything else needs `Authorization: Bearer <token>` resolving to an
//!   identity whose role equals the configured required role.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::authenticator::{AuthError, AuthFailure, AuthUser, Authenticator};
use crate::error::ApiError;

/// Path of the token issuance endpoint
pub const TOKEN_ISSUANCE_PATH: &str = "/login_for_access_token";

pub const MISSING_TOKEN_MESSAGE: &str = "Missing authentication token.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid authentication token.";

/// State handed to [`require_auth`]
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub required_role: Arc<str>,
}

impl AuthState {
    pub fn new(authenticator: Arc<Authenticator>, required_role: impl Into<Arc<str>>) -> Self {
        Self {
            authenticator,
            required_role: required_role.into(),
        }
    }
}

/// Outcome of checking one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// Exempt from checking; no identity attached
    Bypass,
    Allowed(AuthUser),
    Rejected(Rejection),
}

/// Why a request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingToken,
    InvalidToken(AuthFailure),
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingToken => MISSING_TOKEN_MESSAGE,
            Rejection::InvalidToken(_) => INVALID_TOKEN_MESSAGE,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self.message())).into_response()
    }
}

/// Whether the request is exempt from authorization
pub fn is_exempt(method: &Method, path: &str) -> bool {
    *method == Method::GET || *method == Method::OPTIONS || path == TOKEN_ISSUANCE_PATH
}

/// Pull the credential out of the `Authorization` header
///
/// A literal `Bearer ` prefix is stripped when present; a bare token is
/// accepted as-is. An absent or empty credential yields `Ok(None)`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, Rejection> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Rejection::InvalidToken(AuthFailure::MalformedToken))?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);

    Ok((!token.is_empty()).then_some(token))
}

/// Decide what happens to a request
///
/// Only an internal authenticator error is returned as `Err`; every
/// authentication outcome is an [`AuthDecision`].
pub fn authorize(
    state: &AuthState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Result<AuthDecision, AuthError> {
    if is_exempt(method, path) {
        return Ok(AuthDecision::Bypass);
    }

    let token = match extract_bearer(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(AuthDecision::Rejected(Rejection::MissingToken)),
        Err(rejection) => return Ok(AuthDecision::Rejected(rejection)),
    };

    let user = match state.authenticator.resolve(token) {
        Ok(user) => user,
        Err(AuthError::Failed(kind)) => {
            return Ok(AuthDecision::Rejected(Rejection::InvalidToken(kind)))
        }
        Err(err) => return Err(err),
    };

    if user.role != *state.required_role {
        tracing::warn!(
            username = %user.username,
            role = %user.role,
            required_role = %state.required_role,
            "auth: role not permitted"
        );
        return Ok(AuthDecision::Rejected(Rejection::InvalidToken(
            AuthFailure::InsufficientRole,
        )));
    }

    Ok(AuthDecision::Allowed(user))
}

/// Middleware enforcing [`authorize`] on every request
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match authorize(&state, &method, &path, request.headers()) {
        Ok(AuthDecision::Bypass) => next.run(request).await,
        Ok(AuthDecision::Allowed(user)) => {
            tracing::debug!(username = %user.username, %method, %path, "auth: request allowed");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(AuthDecision::Rejected(rejection)) => {
            if let Rejection::InvalidToken(kind) = rejection {
                tracing::warn!(reason = %kind, %method, %path, "auth: invalid token");
            } else {
                tracing::debug!(%method, %path, "auth: missing token");
            }
            rejection.into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, %method, %path, "auth: authenticator failure");
            ApiError::Internal.into_response()
        }
    }
}

/// Handlers behind [`require_auth`] can take the resolved identity directly
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(Rejection::MissingToken)
    }
}
