//! Durable storage for the usage window

use super::window::UsageWindow;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "user_restriction.json";

/// Persisted form of the usage window
#[derive(Debug, Serialize, Deserialize)]
struct StoredUsage {
    count: u32,
    last_update: DateTime<Utc>,
}

/// File-backed store for the usage window, one fixed entry per config dir
#[derive(Debug, Clone)]
pub struct UsageStore {
    dir: PathBuf,
}

impl UsageStore {
    /// Create a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load the stored window, discarding it when it has already elapsed
    pub fn load_fresh(&self, now: DateTime<Utc>, window: Duration) -> Option<UsageWindow> {
        let path = self.path();
        let content = std::fs::read_to_string(&path).ok()?;
        let stored: StoredUsage = serde_json::from_str(&content).ok()?;

        let usage = UsageWindow {
            count: stored.count,
            window_start: stored.last_update,
        };
        if usage.has_elapsed(now, window) {
            let _ = std::fs::remove_file(&path);
            return None;
        }
        Some(usage)
    }

    /// Persist the window
    pub fn save(&self, usage: &UsageWindow) -> crate::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let stored = StoredUsage {
            count: usage.count,
            last_update: usage.window_start,
        };
        let content = serde_json::to_string(&stored)?;
        std::fs::write(self.path(), content)?;
        Ok(())
    }

    /// Remove the stored entry
    pub fn clear(&self) -> crate::Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = UsageStore::new(temp_dir.path());
        let now = Utc::now();

        let usage = UsageWindow {
            count: 4,
            window_start: now,
        };
        store.save(&usage).unwrap();

        let loaded = store
            .load_fresh(now + Duration::minutes(1), Duration::hours(2))
            .unwrap();
        assert_eq!(loaded.count, 4);
    }

    #[test]
    fn test_elapsed_entry_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let store = UsageStore::new(temp_dir.path());
        let old = Utc::now() - Duration::hours(3);

        store
            .save(&UsageWindow {
                count: 10,
                window_start: old,
            })
            .unwrap();

        assert!(store
            .load_fresh(Utc::now(), Duration::hours(2))
            .is_none());
        // The file itself is gone, matching a removed storage entry.
        assert!(!temp_dir.path().join(STORE_FILE).exists());
    }

    #[test]
    fn test_missing_entry_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = UsageStore::new(temp_dir.path());
        assert!(store.load_fresh(Utc::now(), Duration::hours(2)).is_none());
    }
}
