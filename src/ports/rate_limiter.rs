//! Rate limiting port for protecting the paid assistant endpoints.
//!
//! Implementations use a fixed-window counter: in memory for single-node
//! deployments and tests, Redis when several instances share quota.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ClientSessionId, Timestamp};

/// Port for rate limiting operations.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request is allowed, counting it if so.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;
}

/// Key identifying what to rate limit.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    /// Identifier within the scope (IP address or client session id).
    pub identifier: String,
    /// Resource the quota applies to (e.g. "assistant").
    pub resource: String,
}

/// The scope at which rate limiting is applied.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// Per client IP address.
    Ip,
    /// Per browser session.
    ClientSession,
}

impl RateLimitKey {
    /// Creates an IP-based key for a resource.
    pub fn ip(ip: &str, resource: &str) -> Self {
        Self {
            scope: RateLimitScope::Ip,
            identifier: ip.to_string(),
            resource: resource.to_string(),
        }
    }

    /// Creates a client-session key for a resource.
    pub fn client_session(session: &ClientSessionId, resource: &str) -> Self {
        Self {
            scope: RateLimitScope::ClientSession,
            identifier: session.to_string(),
            resource: resource.to_string(),
        }
    }

    /// Creates a session-scope key for a client with no stored session.
    ///
    /// Such clients share one session quota per IP, so a new session id per
    /// request does not yield a fresh quota.
    pub fn unregistered_session(ip: &str, resource: &str) -> Self {
        Self {
            scope: RateLimitScope::ClientSession,
            identifier: format!("ip:{}", ip),
            resource: resource.to_string(),
        }
    }

    /// Returns the Redis key string for this rate limit key.
    pub fn to_redis_key(&self) -> String {
        format!(
            "ratelimit:{}:{}:{}",
            self.scope.as_str(),
            self.identifier,
            self.resource
        )
    }
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Ip => "ip",
            RateLimitScope::ClientSession => "session",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u32,
    /// The scope that triggered the denial.
    pub scope: RateLimitScope,
    pub message: String,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_key_has_correct_scope() {
        let key = RateLimitKey::ip("192.168.1.1", "assistant");
        assert_eq!(key.scope, RateLimitScope::Ip);
        assert_eq!(key.identifier, "192.168.1.1");
        assert_eq!(key.resource, "assistant");
    }

    #[test]
    fn session_key_uses_session_id() {
        let session = ClientSessionId::new();
        let key = RateLimitKey::client_session(&session, "assistant");
        assert_eq!(key.scope, RateLimitScope::ClientSession);
        assert_eq!(key.identifier, session.to_string());
    }

    #[test]
    fn unregistered_session_key_is_per_ip() {
        let key = RateLimitKey::unregistered_session("10.0.0.1", "assistant");
        assert_eq!(key.scope, RateLimitScope::ClientSession);
        assert_eq!(key.to_redis_key(), "ratelimit:session:ip:10.0.0.1:assistant");
    }

    #[test]
    fn redis_key_format() {
        let key = RateLimitKey::ip("10.0.0.1", "assistant");
        assert_eq!(key.to_redis_key(), "ratelimit:ip:10.0.0.1:assistant");
    }

    #[test]
    fn rate_limit_result_predicates() {
        let denied = RateLimitResult::Denied(RateLimitDenied {
            limit: 10,
            retry_after_secs: 30,
            scope: RateLimitScope::ClientSession,
            message: "Rate limit exceeded".to_string(),
        });
        assert!(denied.is_denied());
        assert!(!denied.is_allowed());
    }
}
