//! Assistant tool handlers: resource referral, safe locations, ZindukaBot.

mod chat;
mod find_safe_locations;
mod find_support;
mod structured_completion;

use thiserror::Error;

use crate::domain::assistant::CompletionError;
use crate::domain::foundation::FieldErrors;

pub use chat::{ChatCommand, ChatHandler};
pub use find_safe_locations::{FindSafeLocationsCommand, FindSafeLocationsHandler};
pub use find_support::{FindSupportCommand, FindSupportHandler};
pub use structured_completion::{
    CompletionSettings, StructuredCompletion, DEFAULT_COMPLETION_TIMEOUT,
};

/// Failure of an assistant tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    /// The user's input was rejected before any service call.
    #[error("Invalid input: {0}")]
    Invalid(#[from] FieldErrors),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}
