//! Authentication module for searchgate

pub mod authenticator;
pub mod jwt;
pub mod middleware;
#[cfg(test)]
mod middleware_tests;
pub mod password;
pub mod store;

pub use authenticator::{AuthError, AuthFailure, AuthUser, Authenticator};
pub use jwt::{ClaimSet, Claims, JwtError, TokenCodec, ACCESS_TOKEN_EXPIRE_MINUTES};
pub use middleware::{require_auth, AuthDecision, AuthState, Rejection, TOKEN_ISSUANCE_PATH};
pub use password::{generate_impossible_hash, hash_password, verify_password, PasswordError};
pub use store::{CredentialStore, IdentityRecord, InMemoryCredentialStore, StoreError};
