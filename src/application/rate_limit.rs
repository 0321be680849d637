use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sliding-window attempt counter keyed by normalized login email.
#[derive(Debug, Clone)]
pub struct LoginRateLimiter {
    window: Duration,
    max_attempts: u32,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
    last_sweep: Arc<Mutex<Instant>>,
}

impl LoginRateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            window,
            max_attempts,
            buckets: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record an attempt. Returns `false` once the window is full.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let window = self.window;
        if let Some(mut entry) = self.buckets.get_mut(key) {
            entry.retain(|instant| now.duration_since(*instant) < window);
            if entry.len() as u32 >= self.max_attempts {
                return false;
            }
            entry.push(now);
            return true;
        }

        if self.max_attempts == 0 {
            return false;
        }
        if self.sweep_due(now) {
            self.prune_at(now);
        }
        self.buckets.entry(key.to_string()).or_default().push(now);
        true
    }

    // At most one sweep per window, triggered by unseen keys.
    fn sweep_due(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last_sweep.lock() else {
            return false;
        };
        if now.duration_since(*last) < self.window {
            return false;
        }
        *last = now;
        true
    }

    /// Forget every attempt recorded for `key`.
    pub fn reset(&self, key: &str) {
        self.buckets.remove(key);
    }

    /// Time until the oldest attempt for `key` leaves the window. At least one second.
    pub fn retry_after(&self, key: &str) -> Duration {
        self.retry_after_at(key, Instant::now())
    }

    fn retry_after_at(&self, key: &str, now: Instant) -> Duration {
        let remaining = self
            .buckets
            .get(key)
            .and_then(|bucket| bucket.iter().min().copied())
            .map(|oldest| self.window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or_default();
        remaining.max(Duration::from_secs(1))
    }

    /// Drop buckets whose attempts have all left the window.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let window = self.window;
        let before = self.buckets.len();
        self.buckets.retain(|_, attempts| {
            attempts.retain(|instant| now.duration_since(*instant) < window);
            !attempts.is_empty()
        });
        before.saturating_sub(self.buckets.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}
