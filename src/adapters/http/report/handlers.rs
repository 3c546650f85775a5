//! HTTP handlers for incident report endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{CurrentSession, StoredSession};
use crate::adapters::http::submission::run_detached;
use crate::application::handlers::{ListMyReportsError, ListMyReportsHandler, ListMyReportsQuery};
use crate::domain::foundation::ErrorCode;
use crate::domain::report::IncidentReportForm;

use super::dto::{ReportListResponse, SubmitReportRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ReportHandlers {
    list_handler: Arc<ListMyReportsHandler>,
}

impl ReportHandlers {
    pub fn new(list_handler: Arc<ListMyReportsHandler>) -> Self {
        Self { list_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/reports - Submit an incident report
pub async fn submit_report(
    StoredSession(session): StoredSession,
    req: Result<Json<SubmitReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req?;
    let form = IncidentReportForm::from(req);
    Ok(run_detached(async move { session.reports().submit(form).await }).await)
}

/// GET /api/reports - List the session's own reports
pub async fn list_reports(
    State(handlers): State<ReportHandlers>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let query = ListMyReportsQuery {
        owner: session.gate().current(),
    };

    match handlers.list_handler.handle(query).await {
        Ok(reports) => (StatusCode::OK, Json(ReportListResponse::from(reports))).into_response(),
        Err(ListMyReportsError::NoIdentity) => ApiError::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::NoIdentity,
            "No reports have been submitted from this session.",
        )
        .into_response(),
        Err(ListMyReportsError::Persistence(e)) => {
            tracing::warn!(error = %e, "Listing reports failed");
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                ErrorCode::PersistenceFailed,
                "Could not load your reports. Please try again.",
            )
            .into_response()
        }
    }
}
