//! Server-side per-session quotas
//!
//! The client keeps its own usage window, but the gateway enforces the same
//! limits keyed by session id so that clearing client storage does not
//! reset the quota.

use chrono::{DateTime, Duration, Utc};
use gamma_core::limits::UsageWindow;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Keyed usage windows with a shared limit
pub struct QuotaTracker {
    windows: Mutex<HashMap<String, UsageWindow>>,
    limit: u32,
    window: Duration,
}

impl QuotaTracker {
    /// Create a tracker allowing `limit` sends per `window_secs` seconds
    pub fn new(limit: u32, window_secs: u64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            limit,
            window: Duration::seconds(window_secs as i64),
        }
    }

    /// Whether the session may send now
    pub fn check(&self, session: &str, now: DateTime<Utc>) -> bool {
        let windows = self.windows.lock();
        windows
            .get(session)
            .map_or(true, |usage| !usage.is_exhausted(now, self.limit, self.window))
    }

    /// Record a successful send for the session
    pub fn record(&self, session: &str, now: DateTime<Utc>) {
        let mut windows = self.windows.lock();
        match windows.get_mut(session) {
            Some(usage) => usage.record_send(now, self.window),
            None => {
                windows.insert(session.to_string(), UsageWindow::starting_at(now));
            }
        }
    }

    /// Current count for a session, for observability
    pub fn count(&self, session: &str) -> u32 {
        self.windows
            .lock()
            .get(session)
            .map_or(0, |usage| usage.count)
    }
}
