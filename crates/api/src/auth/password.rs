//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Argon2 memory cost in KiB (19 MiB, OWASP minimum for Argon2id)
pub const ARGON2_MEMORY_KIB: u32 = 19_456;
/// Argon2 iteration count
pub const ARGON2_ITERATIONS: u32 = 2;
/// Argon2 lanes
pub const ARGON2_PARALLELISM: u32 = 1;

fn argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        None,
    )
    .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id
///
/// The salt and cost parameters are embedded in the returned PHC string, so
/// two calls with the same input produce different hashes that both verify.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Generate a cryptographically random "impossible" password hash
///
/// The hash is valid Argon2 format but the password is unknowable. Verifying
/// against it costs the same as verifying a real hash.
pub fn generate_impossible_hash() -> Result<String, PasswordError> {
    use argon2::password_hash::rand_core::RngCore;

    let mut random_bytes = [0u8; 64];
    OsRng.fill_bytes(&mut random_bytes);

    hash_password(&hex::encode(random_bytes))
}

/// Verify a password against a hash
///
/// Never fails: a hash that cannot be parsed simply does not match.
/// Parameters are read from the hash itself.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "verify_password: unparseable hash");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
