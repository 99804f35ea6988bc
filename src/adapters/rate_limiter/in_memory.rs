//! In-memory rate limiter implementation.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap. Counts
//! are per process, so several replicas each enforce their own quota.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimiter};

/// Stale windows are pruned on rollover once the map grows past this size.
const PRUNE_THRESHOLD: usize = 4096;

/// Source of the current time in Unix milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// In-memory rate limiter for single-instance deployments.
pub struct InMemoryRateLimiter {
    /// Window length in milliseconds.
    window_ms: i64,
    /// Per-key window state.
    windows: Arc<RwLock<Windows>>,
    clock: Clock,
}

/// Counters plus the last window a prune pass ran for.
#[derive(Debug, Default)]
struct Windows {
    entries: HashMap<RateLimitKey, WindowState>,
    pruned_bucket: i64,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// Index of the window since the Unix epoch.
    bucket: i64,
}

impl InMemoryRateLimiter {
    pub fn new(window_secs: u32) -> Self {
        Self::with_clock(window_secs, Arc::new(|| chrono::Utc::now().timestamp_millis()))
    }

    /// Creates a limiter reading time from `clock` instead of the wall clock.
    pub fn with_clock(window_secs: u32, clock: Clock) -> Self {
        Self {
            window_ms: i64::from(window_secs.max(1)) * 1000,
            windows: Arc::new(RwLock::new(Windows::default())),
            clock,
        }
    }

    /// Checks a key against `limit` at an explicit instant.
    pub async fn check_at(&self, key: &RateLimitKey, limit: u32, now_ms: i64) -> RateLimitResult {
        let bucket = now_ms.div_euclid(self.window_ms);

        let mut windows = self.windows.write().await;

        // At most one scan per window: everything older than `bucket` is stale
        if bucket > windows.pruned_bucket {
            windows.pruned_bucket = bucket;
            if windows.entries.len() > PRUNE_THRESHOLD {
                windows.entries.retain(|_, state| state.bucket == bucket);
            }
        }

        let state = windows
            .entries
            .entry(key.clone())
            .or_insert(WindowState { count: 0, bucket });

        // Window rolled over
        if state.bucket != bucket {
            state.count = 0;
            state.bucket = bucket;
        }

        if state.count >= limit {
            let window_end = (bucket + 1) * self.window_ms;
            let retry_after_secs = ((window_end - now_ms) as u64).div_ceil(1000) as u32;

            return RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after_secs.max(1),
                scope: key.scope,
            });
        }

        state.count += 1;

        RateLimitResult::Allowed {
            remaining: limit.saturating_sub(state.count),
        }
    }
}

impl fmt::Debug for InMemoryRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRateLimiter")
            .field("window_ms", &self.window_ms)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(
        &self,
        key: &RateLimitKey,
        limit: u32,
    ) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, limit, (self.clock)()).await)
    }
}
