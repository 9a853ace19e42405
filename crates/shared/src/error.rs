//! Error types for the search domain

use thiserror::Error;

/// Minimum number of characters a query context entry must carry
pub const MIN_CONTEXT_CHARS: usize = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The query itself is unusable (caller error)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached or answered with a failure status
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but not with a search response
    #[error("Unexpected search backend response: {0}")]
    BadResponse(String),
}

impl SearchError {
    /// Returns true if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::Unavailable(_))
    }
}
