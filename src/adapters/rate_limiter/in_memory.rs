//! In-memory rate limiter for tests and single-instance deployments.
//!
//! Fixed-window counters in a `HashMap`. Expired windows are reset lazily on
//! the next check for the same key.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

/// In-memory fixed-window rate limiter.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: RwLock<HashMap<String, WindowState>>,
}

#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: u64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Checks `key` as if the clock read `now` (Unix seconds).
    async fn check_at(&self, key: &RateLimitKey, now: u64) -> RateLimitResult {
        let (limit, window_secs) = self.config.limit_for(key.scope);
        let mut windows = self.windows.write().await;

        let state = windows.entry(key.to_redis_key()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });
        if now >= state.window_start + window_secs as u64 {
            state.count = 0;
            state.window_start = now;
        }

        let window_end = state.window_start + window_secs as u64;
        if state.count >= limit {
            let retry_after = (window_end.saturating_sub(now) as u32).max(1);
            return RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after,
                scope: key.scope,
                message: format!(
                    "Rate limit exceeded for {}. Retry after {} seconds.",
                    key.scope, retry_after
                ),
            });
        }

        state.count += 1;
        RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(state.count),
            reset_at: Timestamp::from_unix_secs(window_end),
            window_secs,
        })
    }

    /// Drops windows that ended before `now`.
    pub async fn purge_expired(&self, now: Timestamp) -> usize {
        let now = now.as_unix_secs();
        let window_secs = self.config.window_secs as u64;
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, state| state.window_start + window_secs > now);
        before - windows.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(&key, Timestamp::now().as_unix_secs()).await)
    }
}
