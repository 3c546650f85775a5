//! Identity provider port for minting anonymous identities.
//!
//! The Session Gate is the only caller. It guarantees that, per client
//! session, this port is asked at most once at a time and never again once
//! an identity exists.
//!
//! # Contract
//!
//! Implementations must:
//! - Return a fresh anonymous [`Identity`] on success
//! - Return `IdentityError::Unavailable` for transient failures
//! - Return `IdentityError::ProviderDisabled` when anonymous sign-in is off
//! - Never retry internally

use async_trait::async_trait;

use crate::domain::foundation::{Identity, IdentityError};

/// Creates anonymous identities with the external auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new anonymous identity.
    async fn create_anonymous_identity(&self) -> Result<Identity, IdentityError>;
}
