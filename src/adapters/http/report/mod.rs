//! HTTP adapter for incident reports.
//!
//! - `POST /api/reports` - Submit a report under the session's identity
//! - `GET /api/reports` - List the session's own reports

mod dto;
mod handlers;
mod routes;

pub use dto::{ReportListResponse, ReportResponse, SubmitReportRequest};
pub use handlers::ReportHandlers;
pub use routes::report_routes;
