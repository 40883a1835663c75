//! Named cache partitions
//!
//! Partitions are keyed by request URL. Writes are idempotent (same key,
//! equivalent value), so fetch events need no coordination beyond the
//! per-storage lock.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::response::CachedResponse;

/// One named partition with optional LRU bounding
#[derive(Debug)]
struct CachePartition {
    entries: HashMap<String, CachedResponse>,
    /// Recency order, front = least recently used
    order: VecDeque<String>,
    max_entries: Option<usize>,
}

impl CachePartition {
    fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    fn touch(&mut self, url: &str) {
        if let Some(pos) = self.order.iter().position(|u| u == url) {
            self.order.remove(pos);
        }
        self.order.push_back(url.to_string());
    }

    fn lookup(&mut self, url: &str) -> Option<CachedResponse> {
        if self.entries.contains_key(url) {
            self.touch(url);
        }
        self.entries.get(url).cloned()
    }

    fn put(&mut self, response: CachedResponse) {
        let url = response.url.clone();
        self.entries.insert(url.clone(), response);
        self.touch(&url);

        if let Some(max) = self.max_entries {
            while self.entries.len() > max {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                debug!(url = %oldest, "Evicted least recently used cache entry");
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Registry of named partitions
pub struct CacheStorage {
    partitions: Mutex<HashMap<String, CachePartition>>,
}

impl CacheStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self {
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a partition, creating it when absent
    pub fn open(&self, name: &str, max_entries: Option<usize>) {
        self.partitions
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| CachePartition::new(max_entries));
    }

    /// Store a response in a partition, opening it on demand
    pub fn put(&self, name: &str, max_entries: Option<usize>, response: CachedResponse) {
        let mut partitions = self.partitions.lock();
        partitions
            .entry(name.to_string())
            .or_insert_with(|| CachePartition::new(max_entries))
            .put(response);
    }

    /// Look a URL up in one partition
    pub fn match_in(&self, name: &str, url: &str) -> Option<CachedResponse> {
        self.partitions.lock().get_mut(name)?.lookup(url)
    }

    /// Look a URL up across every partition
    pub fn match_any(&self, url: &str) -> Option<CachedResponse> {
        let mut partitions = self.partitions.lock();
        for partition in partitions.values_mut() {
            if let Some(hit) = partition.lookup(url) {
                return Some(hit);
            }
        }
        None
    }

    /// Delete a partition; true when it existed
    pub fn delete(&self, name: &str) -> bool {
        self.partitions.lock().remove(name).is_some()
    }

    /// Names of all partitions
    pub fn names(&self) -> Vec<String> {
        self.partitions.lock().keys().cloned().collect()
    }

    /// Entry count of a partition
    pub fn len_of(&self, name: &str) -> usize {
        self.partitions.lock().get(name).map_or(0, CachePartition::len)
    }
}

impl Default for CacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;

    fn response(url: &str) -> CachedResponse {
        CachedResponse {
            url: url.to_string(),
            status: 200,
            content_type: None,
            body: Bytes::from_static(b"payload"),
            stored_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_and_match() {
        let storage = CacheStorage::new();
        storage.put("static", None, response("https://a.test/x"));

        assert!(storage.match_in("static", "https://a.test/x").is_some());
        assert!(storage.match_any("https://a.test/x").is_some());
        assert!(storage.match_in("static", "https://a.test/y").is_none());
    }

    #[test]
    fn test_delete_partition() {
        let storage = CacheStorage::new();
        storage.open("old-v0", None);
        assert!(storage.delete("old-v0"));
        assert!(!storage.delete("old-v0"));
        assert!(storage.names().is_empty());
    }

    #[test]
    fn test_lru_bound_evicts_oldest() {
        let storage = CacheStorage::new();
        for n in 0..3 {
            storage.put(
                "dynamic",
                Some(2),
                response(&format!("https://cdn.test/{n}")),
            );
        }

        assert_eq!(storage.len_of("dynamic"), 2);
        assert!(storage.match_in("dynamic", "https://cdn.test/0").is_none());
        assert!(storage.match_in("dynamic", "https://cdn.test/2").is_some());
    }

    #[test]
    fn test_lookup_refreshes_recency() {
        let storage = CacheStorage::new();
        storage.put("dynamic", Some(2), response("https://cdn.test/a"));
        storage.put("dynamic", Some(2), response("https://cdn.test/b"));

        // Touch `a` so `b` becomes the eviction candidate.
        storage.match_in("dynamic", "https://cdn.test/a");
        storage.put("dynamic", Some(2), response("https://cdn.test/c"));

        assert!(storage.match_in("dynamic", "https://cdn.test/a").is_some());
        assert!(storage.match_in("dynamic", "https://cdn.test/b").is_none());
    }
}
