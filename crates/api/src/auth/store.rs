//! Credential storage
//!
//! The [`CredentialStore`] trait is the only thing the authenticator knows
//! about where identities live. The in-memory implementation is seeded once
//! at startup and never mutated afterwards, so it can be shared across
//! requests without locking.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A stored identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Argon2 PHC string, never the plaintext
    pub hashed_secret: String,
    pub role: String,
    /// Not consulted by the authorization decision
    #[serde(default)]
    pub disabled: bool,
}

/// Lookup of username → stored identity
pub trait CredentialStore: Send + Sync {
    fn lookup_by_username(&self, username: &str) -> Option<IdentityRecord>;
}

/// Read-only credential store backed by a map
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: HashMap<String, IdentityRecord>,
}

impl InMemoryCredentialStore {
    /// Build a store from seed records. Usernames must be unique and non-empty.
    pub fn from_records(
        records: impl IntoIterator<Item = IdentityRecord>,
    ) -> Result<Self, StoreError> {
        let mut map = HashMap::new();
        for record in records {
            if record.username.is_empty() {
                return Err(StoreError::EmptyUsername);
            }
            if map.contains_key(&record.username) {
                return Err(StoreError::DuplicateUsername(record.username));
            }
            map.insert(record.username.clone(), record);
        }

        Ok(Self { records: map })
    }

    /// Load seed records from a JSON array on disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let records: Vec<IdentityRecord> = serde_json::from_str(&raw)?;

        let store = Self::from_records(records)?;
        tracing::info!(
            path = %path.display(),
            count = store.len(),
            "Loaded credential store"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup_by_username(&self, username: &str) -> Option<IdentityRecord> {
        self.records.get(username).cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate username in credential seed: {0}")]
    DuplicateUsername(String),
    #[error("Credential seed contains an empty username")]
    EmptyUsername,
    #[error("Failed to read credential file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid credential file: {0}")]
    Parse(#[from] serde_json::Error),
}
