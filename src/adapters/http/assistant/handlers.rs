//! HTTP handlers for the assistant tools.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::CurrentSession;
use crate::application::handlers::{
    AssistantError, ChatCommand, ChatHandler, FindSafeLocationsCommand, FindSafeLocationsHandler,
    FindSupportCommand, FindSupportHandler,
};
use crate::domain::foundation::ErrorCode;

use super::dto::{
    ChatMessageRequest, ChatReplyResponse, FindSafeLocationsRequest, FindSafeLocationsResponse,
    FindSupportRequest, FindSupportResponse, GreetingResponse,
};

/// Message shown for every completion failure.
pub const COMPLETION_FAILURE_MESSAGE: &str = "Sorry, we encountered an error. Please try again.";

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AssistantHandlers {
    find_support: Arc<FindSupportHandler>,
    find_safe_locations: Arc<FindSafeLocationsHandler>,
    chat: Arc<ChatHandler>,
}

impl AssistantHandlers {
    pub fn new(
        find_support: Arc<FindSupportHandler>,
        find_safe_locations: Arc<FindSafeLocationsHandler>,
        chat: Arc<ChatHandler>,
    ) -> Self {
        Self {
            find_support,
            find_safe_locations,
            chat,
        }
    }
}

/// POST /api/assistant/referrals - Recommend support resources
pub async fn find_support(
    State(handlers): State<AssistantHandlers>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
    req: Result<Json<FindSupportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req?;
    let cmd = FindSupportCommand {
        location: req.location,
        needs: req.needs,
        client_session: Some(session.id()),
        trace_id: trace_id(&headers),
    };

    Ok(match handlers.find_support.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(FindSupportResponse::from(outcome))).into_response(),
        Err(e) => handle_assistant_error(e),
    })
}

/// POST /api/assistant/safe-locations - Nearby places of safety
pub async fn find_safe_locations(
    State(handlers): State<AssistantHandlers>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
    req: Result<Json<FindSafeLocationsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req?;
    let cmd = FindSafeLocationsCommand {
        user_location: req.user_location,
        client_session: Some(session.id()),
        trace_id: trace_id(&headers),
    };

    Ok(match handlers.find_safe_locations.handle(cmd).await {
        Ok(outcome) => {
            (StatusCode::OK, Json(FindSafeLocationsResponse::from(outcome))).into_response()
        }
        Err(e) => handle_assistant_error(e),
    })
}

/// POST /api/assistant/chat - One ZindukaBot turn
pub async fn chat(
    State(handlers): State<AssistantHandlers>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
    req: Result<Json<ChatMessageRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req?;
    let cmd = ChatCommand {
        message: req.message,
        client_session: Some(session.id()),
        trace_id: trace_id(&headers),
    };

    Ok(match handlers.chat.handle(cmd).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReplyResponse { reply: reply.reply })).into_response(),
        Err(e) => handle_assistant_error(e),
    })
}

/// GET /api/assistant/chat/greeting - Opening message
pub async fn chat_greeting(State(handlers): State<AssistantHandlers>) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        greeting: handlers.chat.greeting().to_string(),
    })
}

/// Request id set by the request-id layer, or a fresh one.
fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn handle_assistant_error(error: AssistantError) -> Response {
    match error {
        AssistantError::Invalid(errors) => ApiError::validation(&errors).into_response(),
        AssistantError::Completion(e) => {
            tracing::warn!(error = %e, "Assistant completion failed");
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                ErrorCode::CompletionFailed,
                COMPLETION_FAILURE_MESSAGE,
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::CompletionError;
    use crate::domain::foundation::{FieldErrors, ValidationError};

    #[test]
    fn trace_id_prefers_request_id_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "req-42".parse().unwrap());
        assert_eq!(trace_id(&headers), "req-42");
    }

    #[test]
    fn trace_id_is_generated_when_absent() {
        assert!(uuid::Uuid::parse_str(&trace_id(&HeaderMap::new())).is_ok());
    }

    #[test]
    fn invalid_input_is_unprocessable() {
        let err = AssistantError::Invalid(FieldErrors::from(ValidationError::empty_field("needs")));
        assert_eq!(handle_assistant_error(err).status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn completion_failure_is_bad_gateway() {
        let err = AssistantError::Completion(CompletionError::provider("boom"));
        assert_eq!(handle_assistant_error(err).status(), StatusCode::BAD_GATEWAY);
    }
}
