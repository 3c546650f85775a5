//! Rate limit quotas for the assistant endpoints.

use serde::{Deserialize, Serialize};

use crate::ports::RateLimitScope;

/// Fixed-window quotas per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per window per client IP.
    pub per_ip: u32,
    /// Requests per window per client session.
    pub per_session: u32,
    /// Window length in seconds.
    pub window_secs: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_ip: 30,
            per_session: 10,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Per-minute quotas.
    pub fn per_minute(per_ip: u32, per_session: u32) -> Self {
        Self {
            per_ip,
            per_session,
            window_secs: 60,
        }
    }

    /// Returns `(limit, window_secs)` for a scope.
    pub fn limit_for(&self, scope: RateLimitScope) -> (u32, u32) {
        match scope {
            RateLimitScope::Ip => (self.per_ip, self.window_secs),
            RateLimitScope::ClientSession => (self.per_session, self.window_secs),
        }
    }
}
