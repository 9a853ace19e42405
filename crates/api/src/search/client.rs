//! HTTP client for the upstream search service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use searchgate_shared::{SearchError, SearchQuery, SearchResponse};

use super::SearchBackend;

/// Maximum number of retry attempts for transient failures
const MAX_RETRIES: usize = 3;

/// Initial backoff duration for retries (100ms)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Maximum backoff duration for retries (5 seconds)
const RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

/// Forwards queries as JSON to a search endpoint
pub struct HttpSearchBackend {
    http_client: Client,
    endpoint: String,
}

impl HttpSearchBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(SearchError::Unavailable(format!("upstream returned {status}")));
        }
        if !status.is_success() {
            return Err(SearchError::BadResponse(format!("upstream returned {status}")));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| SearchError::BadResponse(e.to_string()))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    /// Send the query, retrying transient failures with exponential backoff
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        use tokio_retry::strategy::{jitter, ExponentialBackoff};
        use tokio_retry::Retry;

        let retry_strategy = ExponentialBackoff::from_millis(RETRY_BASE_DELAY.as_millis() as u64)
            .max_delay(RETRY_MAX_DELAY)
            .take(MAX_RETRIES)
            .map(jitter);

        Retry::spawn(retry_strategy, || async {
            let result = self.send_once(query).await;

            match &result {
                Ok(_) => Ok(result),
                Err(e) if e.is_transient() => {
                    tracing::debug!(endpoint = %self.endpoint, error = %e, "Transient search error - will retry");
                    Err(result)
                }
                Err(e) => {
                    tracing::debug!(endpoint = %self.endpoint, error = %e, "Permanent search error - will not retry");
                    Ok(result)
                }
            }
        })
        .await
        .unwrap_or_else(|e| e)
    }
}
