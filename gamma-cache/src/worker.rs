//! Fetch-interception worker

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use gamma_core::config::CacheConfig;

use crate::fetcher::{Fetch, FetchError};
use crate::response::CachedResponse;
use crate::storage::CacheStorage;

/// Worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Active,
}

/// Error type for worker operations
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("precache failed for {asset}: {reason}")]
    Precache { asset: String, reason: String },
}

/// Intercepts fetches with a cache-first / network-first dual policy.
///
/// Fetch events run concurrently; the partitions are the only shared state
/// and their writes are idempotent.
pub struct AssetCacheWorker {
    origin: String,
    config: CacheConfig,
    storage: CacheStorage,
    fetcher: Arc<dyn Fetch>,
    state: Mutex<WorkerState>,
}

impl AssetCacheWorker {
    /// Create a worker for pages served from `origin`
    pub fn new(origin: impl Into<String>, config: CacheConfig, fetcher: Arc<dyn Fetch>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            config,
            storage: CacheStorage::new(),
            fetcher,
            state: Mutex::new(WorkerState::Installing),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        *self.state.lock()
    }

    /// Backing storage, for inspection
    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Pre-cache the static asset list. Any asset failing to fetch fails
    /// the install and the worker stays in `Installing`.
    pub async fn install(&self) -> Result<(), CacheError> {
        info!("Pre-caching {} static assets", self.config.static_assets.len());
        for asset in &self.config.static_assets {
            let url = format!("{}{}", self.origin, asset);
            let response = self.fetcher.fetch(&url).await.map_err(|e| {
                CacheError::Precache {
                    asset: asset.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !response.is_success() {
                return Err(CacheError::Precache {
                    asset: asset.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            self.storage
                .put(&self.config.static_partition, None, response);
        }
        Ok(())
    }

    /// Purge partition generations that are neither the current static nor
    /// dynamic name, then become active.
    pub fn activate(&self) {
        for name in self.storage.names() {
            if name != self.config.static_partition && name != self.config.dynamic_partition {
                info!(partition = %name, "Deleting old cache partition");
                self.storage.delete(&name);
            }
        }
        *self.state.lock() = WorkerState::Active;
    }

    /// Install then activate, logging rather than surfacing failure
    pub async fn bootstrap(&self) -> bool {
        match self.install().await {
            Ok(()) => {
                self.activate();
                true
            }
            Err(e) => {
                error!("Asset cache install failed: {}", e);
                false
            }
        }
    }

    fn is_same_origin(&self, url: &str) -> bool {
        url == self.origin || url.strip_prefix(&self.origin).is_some_and(|rest| rest.starts_with('/'))
    }

    fn is_static_path(&self, path: &str) -> bool {
        self.config.static_assets.iter().any(|asset| asset == path)
            || path.starts_with(&self.config.build_prefix)
    }

    /// Handle one intercepted fetch
    pub async fn handle_fetch(&self, url: &str) -> Result<CachedResponse, CacheError> {
        if self.is_same_origin(url) {
            self.fetch_same_origin(url).await
        } else {
            self.fetch_cross_origin(url).await
        }
    }

    /// Same origin: cache-first, then network with static classification
    async fn fetch_same_origin(&self, url: &str) -> Result<CachedResponse, CacheError> {
        if let Some(hit) = self.storage.match_any(url) {
            debug!(url = %url, "Cache hit");
            return Ok(hit);
        }

        let response = self.fetcher.fetch(url).await?;
        let path = url.strip_prefix(&self.origin).unwrap_or(url);
        if response.is_success() && self.is_static_path(path) {
            debug!(url = %url, "Caching static asset");
            self.storage
                .put(&self.config.static_partition, None, response.clone());
        }
        Ok(response)
    }

    /// Cross origin: network-first, caching successes into the bounded
    /// dynamic partition, falling back to cache on network failure
    async fn fetch_cross_origin(&self, url: &str) -> Result<CachedResponse, CacheError> {
        match self.fetcher.fetch(url).await {
            Ok(response) => {
                if response.is_success() {
                    self.storage.put(
                        &self.config.dynamic_partition,
                        Some(self.config.max_dynamic_entries),
                        response.clone(),
                    );
                }
                Ok(response)
            }
            Err(e) => {
                debug!(url = %url, "Network failed, trying cache fallback");
                self.storage.match_any(url).ok_or(CacheError::Fetch(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchResult;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use std::collections::HashMap;

    const ORIGIN: &str = "https://gamma.test";

    /// Scripted fetcher: counts calls per URL; URLs listed in `down` fail.
    struct MockFetcher {
        calls: Mutex<HashMap<String, usize>>,
        down: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(HashMap::new()),
                down: Mutex::new(Vec::new()),
            })
        }

        fn calls_for(&self, url: &str) -> usize {
            self.calls.lock().get(url).copied().unwrap_or(0)
        }

        fn take_down(&self, url: &str) {
            self.down.lock().push(url.to_string());
        }
    }

    #[async_trait]
    impl Fetch for MockFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            *self.calls.lock().entry(url.to_string()).or_insert(0) += 1;
            if self.down.lock().iter().any(|u| u == url) {
                return Err(FetchError::Unreachable("connection refused".to_string()));
            }
            Ok(CachedResponse {
                url: url.to_string(),
                status: 200,
                content_type: Some("application/octet-stream".to_string()),
                body: Bytes::from_static(b"asset bytes"),
                stored_at: Utc::now(),
            })
        }
    }

    fn worker_with(fetcher: Arc<MockFetcher>, config: CacheConfig) -> AssetCacheWorker {
        AssetCacheWorker::new(ORIGIN, config, fetcher)
    }

    #[tokio::test]
    async fn test_install_precaches_and_activates() {
        let fetcher = MockFetcher::new();
        let config = CacheConfig::default();
        let worker = worker_with(fetcher.clone(), config.clone());

        assert_eq!(worker.state(), WorkerState::Installing);
        assert!(worker.bootstrap().await);
        assert_eq!(worker.state(), WorkerState::Active);
        assert_eq!(
            worker.storage().len_of(&config.static_partition),
            config.static_assets.len()
        );
    }

    #[tokio::test]
    async fn test_failed_install_stays_installing() {
        let fetcher = MockFetcher::new();
        fetcher.take_down(&format!("{ORIGIN}/site.webmanifest"));
        let worker = worker_with(fetcher, CacheConfig::default());

        assert!(!worker.bootstrap().await);
        assert_eq!(worker.state(), WorkerState::Installing);
    }

    #[tokio::test]
    async fn test_activate_purges_old_generations() {
        let fetcher = MockFetcher::new();
        let config = CacheConfig::default();
        let worker = worker_with(fetcher, config.clone());

        worker.storage().open("gamma-static-v0", None);
        worker.activate();

        assert!(!worker.storage().names().contains(&"gamma-static-v0".to_string()));
        assert_eq!(worker.state(), WorkerState::Active);
    }

    #[tokio::test]
    async fn test_same_origin_static_served_from_cache_second_time() {
        let fetcher = MockFetcher::new();
        let worker = worker_with(fetcher.clone(), CacheConfig::default());
        let url = format!("{ORIGIN}/_next/static/chunks/main.js");

        let first = worker.handle_fetch(&url).await.unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(fetcher.calls_for(&url), 1);

        // Classified static, so the second request never hits the network.
        worker.handle_fetch(&url).await.unwrap();
        assert_eq!(fetcher.calls_for(&url), 1);
    }

    #[tokio::test]
    async fn test_same_origin_non_static_is_not_cached() {
        let fetcher = MockFetcher::new();
        let worker = worker_with(fetcher.clone(), CacheConfig::default());
        let url = format!("{ORIGIN}/api/profile");

        worker.handle_fetch(&url).await.unwrap();
        worker.handle_fetch(&url).await.unwrap();
        assert_eq!(fetcher.calls_for(&url), 2);
    }

    #[tokio::test]
    async fn test_cross_origin_network_first_with_cache_fallback() {
        let fetcher = MockFetcher::new();
        let worker = worker_with(fetcher.clone(), CacheConfig::default());
        let url = "https://fonts.example/inter.woff2";

        worker.handle_fetch(url).await.unwrap();
        assert_eq!(fetcher.calls_for(url), 1);

        // Still network-first while reachable.
        worker.handle_fetch(url).await.unwrap();
        assert_eq!(fetcher.calls_for(url), 2);

        // Network gone: the cached copy answers.
        fetcher.take_down(url);
        let fallback = worker.handle_fetch(url).await.unwrap();
        assert_eq!(fallback.url, url);

        // Nothing cached for an unseen URL, so the error propagates.
        let missing = "https://fonts.example/missing.woff2";
        fetcher.take_down(missing);
        assert!(worker.handle_fetch(missing).await.is_err());
    }

    #[tokio::test]
    async fn test_dynamic_partition_is_bounded() {
        let fetcher = MockFetcher::new();
        let config = CacheConfig {
            max_dynamic_entries: 2,
            ..CacheConfig::default()
        };
        let worker = worker_with(fetcher.clone(), config.clone());

        for n in 0..4 {
            worker
                .handle_fetch(&format!("https://cdn.example/{n}.js"))
                .await
                .unwrap();
        }
        assert_eq!(worker.storage().len_of(&config.dynamic_partition), 2);

        // The oldest entry is gone: with the network down it can no longer
        // be served.
        let evicted = "https://cdn.example/0.js";
        fetcher.take_down(evicted);
        assert!(worker.handle_fetch(evicted).await.is_err());
    }
}
