//! Redis-backed rate limiter for multi-instance deployments.
//!
//! Fixed-window counter with `INCR` + `EXPIRE`; the key's TTL is the time
//! left in the window.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self { conn, config }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str, config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(redis_url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, config))
    }
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

/// Builds the check result from the post-increment count and key TTL.
fn evaluate(key: &RateLimitKey, count: i64, ttl: i64, limit: u32, window_secs: u32) -> RateLimitResult {
    let reset_secs = if ttl > 0 { ttl as u32 } else { window_secs };

    if count > limit as i64 {
        let retry_after = reset_secs.max(1);
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

    RateLimitResult::Allowed(RateLimitStatus {
        limit,
        remaining: limit.saturating_sub(count as u32),
        reset_at: Timestamp::now().plus_secs(reset_secs as u64),
        window_secs,
    })
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = key.to_redis_key();
        let (limit, window_secs) = self.config.limit_for(key.scope);
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(&redis_key, 1_i64).await.map_err(unavailable)?;

        // First request in the window starts the clock
        if count == 1 {
            conn.expire::<_, ()>(&redis_key, window_secs as i64)
                .await
                .map_err(unavailable)?;
        }

        let ttl: i64 = conn.ttl(&redis_key).await.map_err(unavailable)?;

        Ok(evaluate(&key, count, ttl, limit, window_secs))
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
