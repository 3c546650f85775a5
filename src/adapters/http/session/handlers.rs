//! HTTP handlers for the client session endpoint.

use axum::Json;

use crate::adapters::http::middleware::{CurrentSession, StoredSession};

use super::dto::SessionStateResponse;

/// GET /api/session - Identity and submission statuses of this browser
pub async fn get_session(CurrentSession(session): CurrentSession) -> Json<SessionStateResponse> {
    Json(SessionStateResponse::from(session.as_ref()))
}

/// POST /api/session - Start (or keep) a stored session for this browser
pub async fn start_session(StoredSession(session): StoredSession) -> Json<SessionStateResponse> {
    Json(SessionStateResponse::from(session.as_ref()))
}
