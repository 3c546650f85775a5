//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (OpenAI, Anthropic, mock)
//! - `auth` - Anonymous identity providers (Firebase, mock)
//! - `store` - Document stores (PostgreSQL, in-memory)
//! - `rate_limiter` - Fixed-window limiters (Redis, in-memory)
//! - `http` - axum REST API

pub mod ai;
pub mod auth;
pub mod http;
pub mod rate_limiter;
pub mod store;

pub use ai::{AnthropicProvider, MockAIProvider, OpenAIProvider};
pub use auth::{FirebaseIdentityProvider, MockIdentityProvider};
pub use rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
pub use store::{InMemoryDocumentStore, PostgresDocumentStore};
