//! Sliding usage window

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counts sends inside a rolling time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    /// Successful sends recorded in the current window
    pub count: u32,
    /// Start of the current window, refreshed on every recorded send
    pub window_start: DateTime<Utc>,
}

impl UsageWindow {
    /// Start a window with a single recorded send
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    /// Whether the window has fully elapsed
    pub fn has_elapsed(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.window_start >= window
    }

    /// Whether further sends must be rejected
    pub fn is_exhausted(&self, now: DateTime<Utc>, limit: u32, window: Duration) -> bool {
        self.count >= limit && !self.has_elapsed(now, window)
    }

    /// Record one successful send.
    ///
    /// An elapsed window resets to a count of one in the same transition;
    /// otherwise the count increments. The window start always moves to `now`.
    pub fn record_send(&mut self, now: DateTime<Utc>, window: Duration) {
        if self.has_elapsed(now, window) {
            self.count = 1;
        } else {
            self.count += 1;
        }
        self.window_start = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: i64) -> Duration {
        Duration::minutes(m)
    }

    #[test]
    fn test_record_increments_inside_window() {
        let t0 = Utc::now();
        let mut w = UsageWindow::starting_at(t0);
        w.record_send(t0 + minutes(5), minutes(120));
        assert_eq!(w.count, 2);
        assert_eq!(w.window_start, t0 + minutes(5));
    }

    #[test]
    fn test_exhausted_at_limit() {
        let t0 = Utc::now();
        let mut w = UsageWindow::starting_at(t0);
        for i in 0..9 {
            w.record_send(t0 + minutes(i), minutes(120));
        }
        assert_eq!(w.count, 10);
        assert!(w.is_exhausted(t0 + minutes(10), 10, minutes(120)));
    }

    #[test]
    fn test_elapsed_window_resets_to_one() {
        let t0 = Utc::now();
        let mut w = UsageWindow::starting_at(t0);
        for i in 0..9 {
            w.record_send(t0 + minutes(i), minutes(120));
        }
        assert_eq!(w.count, 10);

        // A single transition: elapsed window goes straight to count 1.
        let later = t0 + minutes(200);
        w.record_send(later, minutes(120));
        assert_eq!(w.count, 1);
        assert_eq!(w.window_start, later);
        assert!(!w.is_exhausted(later, 10, minutes(120)));
    }

    #[test]
    fn test_exhaustion_clears_once_elapsed() {
        let t0 = Utc::now();
        let w = UsageWindow {
            count: 10,
            window_start: t0,
        };
        assert!(w.is_exhausted(t0 + minutes(119), 10, minutes(120)));
        assert!(!w.is_exhausted(t0 + minutes(120), 10, minutes(120)));
    }
}
