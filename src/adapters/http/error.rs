//! Error body shared by every endpoint.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{ErrorCode, FieldErrors};

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// 422 body listing each rejected field.
    pub fn validation(errors: &FieldErrors) -> Self {
        Self::with_details(
            ErrorCode::ValidationFailed,
            "Please correct the highlighted fields.",
            serde_json::json!({ "fields": errors }),
        )
    }
}

/// An error response with its status code.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
        }
    }

    pub fn validation(errors: &FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorResponse::validation(errors),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, message)
    }
}

/// Unreadable request bodies keep the axum status (400, 415 or 422) but use
/// the standard error body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), ErrorCode::BadRequest, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new(ErrorCode::NoIdentity, "none")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "NO_IDENTITY", "message": "none"}));
    }

    #[test]
    fn validation_body_lists_fields() {
        let errors = FieldErrors::from(ValidationError::empty_field("description"));
        let json = serde_json::to_value(ErrorResponse::validation(&errors)).unwrap();

        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert!(json["details"]["fields"]["description"].is_string());
    }

    #[test]
    fn validation_error_is_unprocessable() {
        let errors = FieldErrors::from(ValidationError::empty_field("title"));
        assert_eq!(
            ApiError::validation(&errors).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    async fn rejection_for(content_type: Option<&str>, body: &'static str) -> ApiError {
        use axum::extract::FromRequest;

        let mut builder = axum::http::Request::builder().method("POST");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(axum::body::Body::from(body)).unwrap();
        let rejection = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        ApiError::from(rejection)
    }

    #[tokio::test]
    async fn malformed_json_uses_the_standard_body() {
        let error = rejection_for(Some("application/json"), "{not json").await;

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.body.code, "BAD_REQUEST");
        assert!(!error.body.message.is_empty());
    }

    #[tokio::test]
    async fn missing_content_type_keeps_its_status() {
        let error = rejection_for(None, "{}").await;

        assert_eq!(error.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error.body.code, "BAD_REQUEST");
    }
}
