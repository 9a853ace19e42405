//! Search backend access
//!
//! Handlers only see the [`SearchBackend`] trait; the HTTP implementation
//! forwards queries to the configured upstream.

mod client;

use async_trait::async_trait;
use searchgate_shared::{SearchError, SearchQuery, SearchResponse};

pub use client::HttpSearchBackend;

/// Something that can answer a search query
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;
}
