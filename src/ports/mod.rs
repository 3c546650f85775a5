//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - the completion service behind the assistant tools
//! - `IdentityProvider` - anonymous identity creation
//! - `DocumentStore` - report and post persistence with live subscriptions
//! - `RateLimiter` - quota for the assistant endpoints

mod ai_provider;
mod document_store;
mod identity_provider;
mod rate_limiter;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use document_store::{validate_collection_path, DocumentStore, QueryOrder, StoredDocument};
pub use identity_provider::IdentityProvider;
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
