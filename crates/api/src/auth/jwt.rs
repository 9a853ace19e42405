//! JWT token generation and validation

use std::collections::HashSet;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Default lifetime of an access token
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Identity fields carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    pub username: String,
    pub role: String,
    /// Carried so the claims describe the identity without a store lookup
    pub hashed_secret: String,
}

/// JWT claims structure for searchgate-issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: ClaimSet,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a new codec from the process-wide signing secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Encode `claims` into a token that expires `ttl` from now
    pub fn encode(&self, claims: &ClaimSet, ttl: Duration) -> Result<String, JwtError> {
        self.encode_at(claims, ttl, OffsetDateTime::now_utc())
    }

    /// Encode `claims` as if the current time were `now`
    pub fn encode_at(
        &self,
        claims: &ClaimSet,
        ttl: Duration,
        now: OffsetDateTime,
    ) -> Result<String, JwtError> {
        let claims = Claims {
            identity: claims.clone(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        // Explicit algorithm prevents algorithm confusion attacks
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Verify and decode a token
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, OffsetDateTime::now_utc())
    }

    /// Verify and decode a token as if the current time were `now`
    ///
    /// The signature is checked before any claim is read. A token is valid
    /// strictly before its `exp` second; there is no clock-skew leeway.
    pub fn decode_at(&self, token: &str, now: OffsetDateTime) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is evaluated below against the supplied clock
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            })?;

        if now.unix_timestamp() >= claims.exp {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,
    #[error("Token signature does not match")]
    InvalidSignature,
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
