//! SubmissionStatus enum for tracking a form's submit lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Lifecycle of the most recent submission of one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// Returns true while a submission is pending.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Idle | Succeeded | Failed -> Submitting
    /// - Submitting -> Succeeded | Failed
    pub fn can_transition_to(&self, target: &SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, target),
            (Idle, Submitting)
                | (Succeeded, Submitting)
                | (Failed, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
        )
    }

    /// Performs a validated transition.
    pub fn transition_to(&self, target: SubmissionStatus) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "submission_status",
                format!("Cannot transition from {} to {}", self, target),
            ))
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Succeeded => "succeeded",
            SubmissionStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
