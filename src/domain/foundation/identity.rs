//! Caller identity types for the domain layer.
//!
//! An [`Identity`] is whoever is submitting: an anonymous identity minted on
//! demand by the identity provider. It carries no personal data.
//!
//! These types have **no provider dependencies** - Firebase, a mock, or any
//! other identity service populates them via the `IdentityProvider` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::IdentityId;

/// The caller on whose behalf records are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier issued by the identity provider.
    pub id: IdentityId,

    /// True for identities created without credentials.
    pub is_anonymous: bool,
}

impl Identity {
    /// Creates an anonymous identity.
    pub fn anonymous(id: IdentityId) -> Self {
        Self {
            id,
            is_anonymous: true,
        }
    }
}

/// Failures creating an anonymous identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The identity service could not be reached or failed transiently.
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),

    /// Anonymous sign-in is switched off at the provider.
    #[error("Anonymous sign-in is disabled")]
    ProviderDisabled,

    /// The provider answered with something that is not an identity.
    #[error("Invalid identity response: {0}")]
    InvalidResponse(String),
}

impl IdentityError {
    /// Creates an unavailable error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns true if asking the user to try again may help.
    pub fn is_transient(&self) -> bool {
        matches!(self, IdentityError::Unavailable(_))
    }
}
