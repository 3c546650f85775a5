//! HTTP DTOs for incident report endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::report::{IncidentReport, IncidentReportForm, IncidentType};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Report form as posted by the browser.
///
/// Missing fields deserialize as empty so they surface as field errors
/// instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReportRequest {
    pub incident_type: String,
    pub incident_date: String,
    pub location: Option<String>,
    pub description: String,
}

impl From<SubmitReportRequest> for IncidentReportForm {
    fn from(req: SubmitReportRequest) -> Self {
        Self {
            incident_type: req.incident_type,
            incident_date: req.incident_date,
            location: req.location,
            description: req.description,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub incident_type: IncidentType,
    pub incident_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub description: String,
    pub user_id: String,
    pub anonymous: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&IncidentReport> for ReportResponse {
    fn from(report: &IncidentReport) -> Self {
        Self {
            id: report.id().to_string(),
            incident_type: report.incident_type(),
            incident_date: report.incident_date().format("%Y-%m-%d").to_string(),
            location: report.location().map(str::to_string),
            description: report.description().to_string(),
            user_id: report.user_id().to_string(),
            anonymous: report.is_anonymous(),
            created_at: report.created_at().to_rfc3339(),
            updated_at: report.updated_at().to_rfc3339(),
        }
    }
}

/// The caller's reports, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportResponse>,
}

impl From<Vec<IncidentReport>> for ReportListResponse {
    fn from(reports: Vec<IncidentReport>) -> Self {
        Self {
            reports: reports.iter().map(ReportResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reads_camel_case_fields() {
        let req: SubmitReportRequest = serde_json::from_value(serde_json::json!({
            "incidentType": "physical",
            "incidentDate": "2024-03-01",
            "description": "Something happened here."
        }))
        .unwrap();

        let form = IncidentReportForm::from(req);
        assert_eq!(form.incident_type, "physical");
        assert_eq!(form.incident_date, "2024-03-01");
        assert_eq!(form.location, None);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let req: SubmitReportRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.description.is_empty());
    }
}
