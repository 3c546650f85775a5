//! Report module - Anonymous incident reports.
//!
//! A report moves from a raw [`IncidentReportForm`] through validation into
//! a [`ValidIncidentReport`], and is persisted as an [`IncidentReportBody`]
//! under its owner's collection.

mod form;
mod incident_type;
mod record;

pub use form::{
    IncidentReportForm, ValidIncidentReport, DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS,
};
pub use incident_type::IncidentType;
pub use record::{reports_collection, IncidentReport, IncidentReportBody};
