//! Offline asset cache worker for gamma
//!
//! Intercepts fetches for the hosting page: same-origin requests are served
//! cache-first, cross-origin requests network-first with a cached fallback.
//! Two named partitions hold build-time and runtime resources; stale
//! partition generations are purged on activation.

pub mod fetcher;
pub mod response;
pub mod storage;
pub mod worker;

pub use fetcher::{Fetch, FetchError, HttpFetcher};
pub use response::CachedResponse;
pub use storage::CacheStorage;
pub use worker::{AssetCacheWorker, CacheError, WorkerState};
