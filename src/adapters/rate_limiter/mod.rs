//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port for different backends.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateLimiter` - In-memory for tests and single-instance deployments
//! - `RedisRateLimiter` - Redis-backed for multi-instance deployments
//!
//! ## Usage
//!
//! ```ignore
//! use safe_haven::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
//!
//! let limiter = InMemoryRateLimiter::new(RateLimitConfig::per_minute(30, 10));
//! let limiter = RedisRateLimiter::connect("redis://127.0.0.1/", RateLimitConfig::default()).await?;
//! ```

mod config;
mod in_memory;
mod redis;

pub use config::RateLimitConfig;
pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
