//! Maps a [`SubmitOutcome`] onto an HTTP response.
//!
//! | Outcome | Status | Code |
//! |---------|--------|------|
//! | Submitted | 201 | - |
//! | Rejected | 422 | `VALIDATION_FAILED` |
//! | Ignored | 409 | `SUBMISSION_IN_FLIGHT` |
//! | Failed (identity) | 502 | `IDENTITY_UNAVAILABLE` |
//! | Failed (store) | 502 | `PERSISTENCE_FAILED` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::error::{ApiError, ErrorResponse};
use crate::application::SubmitOutcome;
use crate::domain::foundation::ErrorCode;
use crate::domain::submission::{SubmissionError, SubmissionStatus};

/// Body of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    pub id: String,
    pub owner_id: String,
    pub status: SubmissionStatus,
}

/// Runs `submit` detached from the request so a client disconnect cannot
/// abandon a write halfway through.
pub async fn run_detached<F>(submit: F) -> Response
where
    F: std::future::Future<Output = SubmitOutcome> + Send + 'static,
{
    match tokio::spawn(submit).await {
        Ok(outcome) => submit_outcome_response(outcome),
        Err(e) => {
            tracing::error!(error = %e, "Submission task aborted");
            ApiError::internal("Submission could not be completed").into_response()
        }
    }
}

pub fn submit_outcome_response(outcome: SubmitOutcome) -> Response {
    match outcome {
        SubmitOutcome::Submitted { id, owner } => (
            StatusCode::CREATED,
            Json(SubmittedResponse {
                id: id.to_string(),
                owner_id: owner.id.to_string(),
                status: SubmissionStatus::Succeeded,
            }),
        )
            .into_response(),
        SubmitOutcome::Rejected(errors) => ApiError::validation(&errors).into_response(),
        SubmitOutcome::Ignored => ApiError::new(
            StatusCode::CONFLICT,
            ErrorCode::SubmissionInFlight,
            "A submission is already in progress.",
        )
        .into_response(),
        SubmitOutcome::Failed(err) => failure_response(&err),
    }
}

fn failure_response(err: &SubmissionError) -> Response {
    let code = match err {
        SubmissionError::Identity(_) => ErrorCode::IdentityUnavailable,
        SubmissionError::Persistence(_) => ErrorCode::PersistenceFailed,
    };
    let body = ErrorResponse::with_details(
        code,
        err.user_message(),
        serde_json::json!({ "retryable": err.can_retry() }),
    );
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{
        DocumentId, FieldErrors, Identity, IdentityError, IdentityId, ValidationError,
    };
    use crate::domain::submission::PersistenceError;

    #[test]
    fn submitted_is_created() {
        let response = submit_outcome_response(SubmitOutcome::Submitted {
            id: DocumentId::generate(),
            owner: Identity::anonymous(IdentityId::new("anon-1").unwrap()),
        });
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn rejected_is_unprocessable() {
        let errors = FieldErrors::from(ValidationError::empty_field("title"));
        let response = submit_outcome_response(SubmitOutcome::Rejected(errors));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ignored_is_conflict() {
        let response = submit_outcome_response(SubmitOutcome::Ignored);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn failures_are_bad_gateway() {
        for err in [
            SubmissionError::from(IdentityError::ProviderDisabled),
            SubmissionError::from(PersistenceError::unavailable("down")),
        ] {
            let response = submit_outcome_response(SubmitOutcome::Failed(err));
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }
}
