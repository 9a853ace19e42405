//! Credential → token → identity
//!
//! The [`Authenticator`] ties the credential store, the password hasher and
//! the token codec together. It is built once at startup and shared
//! read-only by every request.
//!
//! Every failure collapses into [`AuthError::Failed`]. The [`AuthFailure`]
//! it carries says which check failed; that detail goes to the logs and is
//! never rendered into a response.

use std::fmt;
use std::sync::Arc;

use time::Duration;

use super::jwt::{ClaimSet, Claims, JwtError, TokenCodec};
use super::password::{generate_impossible_hash, verify_password, PasswordError};
use super::store::CredentialStore;

/// Which check rejected a credential or token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    LookupMiss,
    SecretMismatch,
    MalformedToken,
    InvalidSignature,
    Expired,
    InsufficientRole,
}

impl AuthFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFailure::LookupMiss => "lookup_miss",
            AuthFailure::SecretMismatch => "secret_mismatch",
            AuthFailure::MalformedToken => "malformed_token",
            AuthFailure::InvalidSignature => "invalid_signature",
            AuthFailure::Expired => "expired",
            AuthFailure::InsufficientRole => "insufficient_role",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Deliberately carries no detail in its message
    #[error("Authentication failed")]
    Failed(AuthFailure),
    /// Not an authentication outcome; must surface as a server error
    #[error("Authentication subsystem error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthError::Failed(kind) => Some(*kind),
            AuthError::Internal(_) => None,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::Failed(AuthFailure::Expired),
            JwtError::InvalidSignature => AuthError::Failed(AuthFailure::InvalidSignature),
            JwtError::Malformed(_) => AuthError::Failed(AuthFailure::MalformedToken),
            JwtError::Encoding(msg) => AuthError::Internal(msg),
        }
    }
}

/// Identity resolved from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

impl AuthUser {
    /// Build an identity straight from verified claims (no store round-trip)
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let ClaimSet { username, role, .. } = &claims.identity;
        if username.is_empty() || role.is_empty() {
            return Err(AuthError::Failed(AuthFailure::MalformedToken));
        }

        Ok(Self {
            username: username.clone(),
            role: role.clone(),
        })
    }
}

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    token_ttl: Duration,
    /// Verified against when the username is unknown, so misses cost as much as mismatches
    decoy_hash: String,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: TokenCodec,
        token_ttl: Duration,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            store,
            codec,
            token_ttl,
            decoy_hash: generate_impossible_hash()?,
        })
    }

    /// Lifetime applied to every issued token
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Exchange a username and password for a signed access token
    pub fn issue(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let record = match self.store.lookup_by_username(username) {
            Some(record) => record,
            None => {
                let _ = verify_password(password, &self.decoy_hash);
                return Err(self.reject(username, AuthFailure::LookupMiss));
            }
        };

        if !verify_password(password, &record.hashed_secret) {
            return Err(self.reject(username, AuthFailure::SecretMismatch));
        }

        let claims = ClaimSet {
            username: record.username,
            role: record.role,
            hashed_secret: record.hashed_secret,
        };
        let token = self.codec.encode(&claims, self.token_ttl).map_err(|e| {
            tracing::error!(error = %e, username = %username, "issue: token encoding failed");
            AuthError::from(e)
        })?;

        tracing::info!(username = %username, role = %claims.role, "issue: access token issued");
        Ok(token)
    }

    /// Turn a presented token back into an identity
    pub fn resolve(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.codec.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "resolve: token rejected by codec");
            AuthError::from(e)
        })?;

        AuthUser::from_claims(&claims)
    }

    fn reject(&self, username: &str, kind: AuthFailure) -> AuthError {
        tracing::warn!(username = %username, reason = %kind, "issue: authentication failed");
        AuthError::Failed(kind)
    }
}
