//! Incident report command and query handlers.

mod list_my_reports;
mod submit_report;

pub use list_my_reports::{ListMyReportsError, ListMyReportsHandler, ListMyReportsQuery};
pub use submit_report::ReportSubmission;
