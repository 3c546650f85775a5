//! Error types for the domain layer.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at least {min} characters, got {actual}")]
    TooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-short validation error.
    pub fn too_short(field: impl Into<String>, min: usize, actual: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
            actual,
        }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Field-level validation failures for a whole form.
///
/// Keeps the first error reported per field, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the field already has one.
    pub fn push(&mut self, error: ValidationError) {
        self.0
            .entry(error.field().to_string())
            .or_insert_with(|| error.to_string());
    }

    /// Records the error of a failed check, passing successes through.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for FieldErrors {}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(error);
        errors
    }
}

/// Error codes surfaced to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    BadRequest,

    // Session errors
    NoIdentity,
    SubmissionInFlight,
    SessionCapacity,

    // Collaborator errors
    IdentityUnavailable,
    PersistenceFailed,
    CompletionFailed,
    RateLimited,

    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::NoIdentity => "NO_IDENTITY",
            ErrorCode::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
            ErrorCode::SessionCapacity => "SESSION_CAPACITY",
            ErrorCode::IdentityUnavailable => "IDENTITY_UNAVAILABLE",
            ErrorCode::PersistenceFailed => "PERSISTENCE_FAILED",
            ErrorCode::CompletionFailed => "COMPLETION_FAILED",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("incident_type");
        assert_eq!(format!("{}", err), "Field 'incident_type' cannot be empty");
    }

    #[test]
    fn validation_error_too_short_displays_correctly() {
        let err = ValidationError::too_short("description", 10, 3);
        assert_eq!(
            format!("{}", err),
            "Field 'description' must be at least 10 characters, got 3"
        );
    }

    #[test]
    fn validation_error_reports_its_field() {
        assert_eq!(ValidationError::too_long("title", 5, 9).field(), "title");
        assert_eq!(
            ValidationError::invalid_format("incident_date", "bad").field(),
            "incident_date"
        );
    }

    #[test]
    fn field_errors_keep_first_error_per_field() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::empty_field("title"));
        errors.push(ValidationError::too_short("title", 5, 0));
        errors.push(ValidationError::empty_field("content"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("title"), Some("Field 'title' cannot be empty"));
        assert!(errors.contains("content"));
    }

    #[test]
    fn field_errors_check_passes_values_through() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.check(Ok::<_, ValidationError>(3)), Some(3));
        assert!(errors.is_empty());

        let missing: Option<u8> = errors.check(Err(ValidationError::empty_field("x")));
        assert!(missing.is_none());
        assert!(errors.contains("x"));
    }

    #[test]
    fn field_errors_serialize_as_map() {
        let errors: FieldErrors = ValidationError::empty_field("title").into();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"], "Field 'title' cannot be empty");
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::NoIdentity), "NO_IDENTITY");
        assert_eq!(format!("{}", ErrorCode::SubmissionInFlight), "SUBMISSION_IN_FLIGHT");
    }
}
