//! Rate Limiting
//!
//! Sliding-window limits keyed by an arbitrary string (usually
//! `"{scope}:{client_ip}"`).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// When the oldest counted request leaves the window (Unix ms)
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until a retry can succeed, for `Retry-After`
    pub fn retry_after_secs(&self) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_unix_ms()).max(0) as u64;
        remaining_ms.div_ceil(1000).max(1)
    }
}

pub type RateLimitStoreError = Box<dyn std::error::Error + Send + Sync>;

/// Storage backend for rate-limit counters
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Record one request for `key` and report whether it is allowed.
    ///
    /// Rejected requests are not counted.
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local sliding window, `HashMap<key, VecDeque<Instant>>`.
///
/// Enough for a single API instance; counters reset on restart.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_at(&self, key: &str, config: &RateLimitConfig, now: Instant) -> RateLimitResult {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Drop idle keys so the map does not grow without bound
        windows.retain(|k, hits| {
            k == key || hits.back().is_some_and(|t| now.duration_since(*t) < config.window)
        });

        let hits = windows.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|t| now.duration_since(*t) >= config.window)
        {
            hits.pop_front();
        }

        let allowed = (hits.len() as u32) < config.max_requests;
        if allowed {
            hits.push_back(now);
        }

        let reset_in = hits
            .front()
            .map(|oldest| config.window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or_default();

        RateLimitResult {
            allowed,
            remaining: config.max_requests.saturating_sub(hits.len() as u32),
            reset_at_ms: now_unix_ms() + reset_in.as_millis() as i64,
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        Ok(self.check_at(key, config, Instant::now()))
    }
}

fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
