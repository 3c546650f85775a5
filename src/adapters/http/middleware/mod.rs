//! HTTP middleware for axum.
//!
//! - `client_session` - Resolves the browser session and echoes stored ids
//! - `rate_limit` - IP and session quotas for the assistant endpoints

pub mod client_session;
pub mod rate_limit;

pub use client_session::{
    client_session_middleware, CurrentSession, StoredSession, CLIENT_SESSION_HEADER,
};
pub use rate_limit::{assistant_rate_limit, RateLimiterState, ASSISTANT_RESOURCE};
