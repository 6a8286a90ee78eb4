//! Per-endpoint sliding-window rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Width of the sliding window.
pub const WINDOW: Duration = Duration::from_secs(60);

/// In-memory sliding-window rate limiter keyed by endpoint.
///
/// Each key keeps the timestamps of its accepted calls from the last 60
/// seconds. A call is admitted only while the window holds fewer than the
/// endpoint's budget; rejected calls are not recorded, so they do not extend
/// the window.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call under `key` if the budget allows it.
    ///
    /// Returns `false` without recording anything when `key` already has
    /// `max_per_minute` calls inside the window.
    pub fn allow(&self, key: &str, max_per_minute: usize) -> bool {
        self.allow_at(key, max_per_minute, Instant::now())
    }

    fn allow_at(&self, key: &str, max_per_minute: usize, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        let calls = windows.entry(key.to_string()).or_default();
        calls.retain(|t| now.duration_since(*t) < WINDOW);
        if calls.len() >= max_per_minute {
            tracing::warn!("Rate limit exceeded for endpoint: {}", key);
            return false;
        }
        calls.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_budget() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.allow("synthesize", 5));
        }
        assert!(!limiter.allow("synthesize", 5));
    }

    #[test]
    fn test_rejected_calls_do_not_extend_window() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        for _ in 0..3 {
            assert!(limiter.allow_at("voices", 3, start));
        }
        // Hammering a saturated window must not push the reset further out.
        for i in 0..10 {
            let now = start + Duration::from_secs(i);
            assert!(!limiter.allow_at("voices", 3, now));
        }
        let after_window = start + WINDOW;
        assert!(limiter.allow_at("voices", 3, after_window));
    }

    #[test]
    fn test_window_slides_per_call() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        assert!(limiter.allow_at("k", 2, start));
        assert!(limiter.allow_at("k", 2, start + Duration::from_secs(30)));
        assert!(!limiter.allow_at("k", 2, start + Duration::from_secs(45)));
        // The first call has aged out; the one from t+30 has not.
        assert!(limiter.allow_at("k", 2, start + Duration::from_secs(61)));
        assert!(!limiter.allow_at("k", 2, start + Duration::from_secs(62)));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        assert!(limiter.allow("a", 1));
        assert!(!limiter.allow("a", 1));
        assert!(limiter.allow("b", 1));
    }
}
