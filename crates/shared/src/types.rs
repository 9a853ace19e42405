//! Request and response shapes for the search proxy

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, MIN_CONTEXT_CHARS};

fn default_engine_type() -> String {
    "weaviate".to_string()
}

fn default_search_configs() -> String {
    "search_configs".to_string()
}

fn default_related_docs() -> String {
    "related_docs".to_string()
}

/// Query context: a single text or a batch of texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryContext {
    Single(String),
    Many(Vec<String>),
}

fn too_short(text: &str) -> bool {
    text.trim().chars().count() < MIN_CONTEXT_CHARS
}

impl QueryContext {
    /// Check that every entry carries enough text to search on.
    pub fn validate(&self) -> Result<(), SearchError> {
        match self {
            QueryContext::Single(text) if too_short(text) => Err(SearchError::InvalidInput(
                format!("context must be at least {MIN_CONTEXT_CHARS} characters"),
            )),
            QueryContext::Many(texts) if texts.is_empty() => Err(SearchError::InvalidInput(
                "context list must not be empty".to_string(),
            )),
            QueryContext::Many(texts) if texts.iter().any(|t| too_short(t)) => {
                Err(SearchError::InvalidInput(format!(
                    "every context entry must be at least {MIN_CONTEXT_CHARS} characters"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Body of `POST /v1/from_query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default = "default_engine_type")]
    pub engine_type: String,
    #[serde(default = "default_search_configs")]
    pub search_configs: String,
    pub context: QueryContext,
}

/// What the search backend returns for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: QueryContext,
    #[serde(default = "default_engine_type")]
    pub engine_type: String,
    #[serde(default = "default_search_configs")]
    pub search_configs: String,
    #[serde(default = "default_related_docs")]
    pub related_docs: String,
}
