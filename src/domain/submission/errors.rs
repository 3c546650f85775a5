//! Errors raised while persisting a submission.

use thiserror::Error;

use crate::domain::foundation::IdentityError;

/// Document store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The store could not be reached or timed out.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (permissions, quota, bad path).
    #[error("Document store rejected the operation: {0}")]
    Rejected(String),

    /// A document could not be encoded or decoded.
    #[error("Document serialization failed: {0}")]
    Serialization(String),
}

impl PersistenceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Why a validated submission could not be saved.
///
/// Either way the draft is kept so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Could not establish an identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("Could not save submission: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SubmissionError {
    /// Message safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionError::Identity(_) => {
                "Could not create a secure session. Please try again."
            }
            SubmissionError::Persistence(_) => {
                "There was an error saving your submission. Please try again."
            }
        }
    }

    /// Every submission failure may be retried by the user.
    pub fn can_retry(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_failure_has_session_message() {
        let err: SubmissionError = IdentityError::ProviderDisabled.into();
        assert_eq!(
            err.user_message(),
            "Could not create a secure session. Please try again."
        );
        assert!(err.can_retry());
    }

    #[test]
    fn persistence_failure_wraps_detail() {
        let err: SubmissionError = PersistenceError::unavailable("connection reset").into();
        assert_eq!(
            err.to_string(),
            "Could not save submission: Document store unavailable: connection reset"
        );
    }

    #[test]
    fn serde_errors_become_serialization_failures() {
        let bad = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        assert!(matches!(
            PersistenceError::from(bad),
            PersistenceError::Serialization(_)
        ));
    }
}
