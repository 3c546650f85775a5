//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the SafeHaven domain.

mod errors;
mod identity;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, FieldErrors, ValidationError};
pub use identity::{Identity, IdentityError};
pub use ids::{ClientSessionId, DocumentId, IdentityId};
pub use timestamp::Timestamp;
