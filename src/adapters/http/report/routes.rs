//! HTTP routes for incident report endpoints.

use axum::{routing::get, Router};

use super::handlers::{list_reports, submit_report, ReportHandlers};

/// Creates the report router.
pub fn report_routes(handlers: ReportHandlers) -> Router {
    Router::new()
        .route("/", get(list_reports).post(submit_report))
        .with_state(handlers)
}
