//! Completion error taxonomy.

use std::time::Duration;
use thiserror::Error;

/// A completion call that produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The completion service failed or could not be reached.
    #[error("Completion service failed: {0}")]
    Provider(String),

    /// No answer arrived within the configured deadline.
    #[error("Completion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The service answered, but not with the declared output shape.
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_displays_seconds() {
        let err = CompletionError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Completion timed out after 30s");
    }

    #[test]
    fn invalid_response_keeps_detail() {
        let err = CompletionError::invalid_response("missing field `address`");
        assert!(err.to_string().contains("missing field `address`"));
    }
}
