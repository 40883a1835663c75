//! Network fetch seam

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::response::CachedResponse;

/// Error type for fetch operations.
///
/// A fetch fails only when the network does; HTTP error statuses still
/// resolve to a response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("network unreachable: {0}")]
    Unreachable(String),
}

pub type FetchResult = Result<CachedResponse, FetchError>;

/// Performs the actual network fetch for the worker
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch a URL and return the full response
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await?;

        Ok(CachedResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
            stored_at: Utc::now(),
        })
    }
}
