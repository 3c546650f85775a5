//! ReportSubmission - persists validated incident reports.
//!
//! Plugged into a [`SubmissionCoordinator`](crate::application::SubmissionCoordinator);
//! the coordinator handles single-in-flight, drafts and identity gating.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::Submission;
use crate::domain::foundation::{DocumentId, FieldErrors, Identity, Timestamp};
use crate::domain::report::{
    reports_collection, IncidentReportBody, IncidentReportForm, ValidIncidentReport,
};
use crate::domain::submission::PersistenceError;
use crate::ports::DocumentStore;

/// Submission of anonymous incident reports.
pub struct ReportSubmission {
    store: Arc<dyn DocumentStore>,
}

impl ReportSubmission {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Submission for ReportSubmission {
    type Form = IncidentReportForm;
    type Valid = ValidIncidentReport;

    const KIND: &'static str = "incident_report";

    fn validate(&self, form: &IncidentReportForm) -> Result<ValidIncidentReport, FieldErrors> {
        form.validate(Timestamp::now().date())
    }

    async fn persist(
        &self,
        valid: ValidIncidentReport,
        owner: &Identity,
    ) -> Result<DocumentId, PersistenceError> {
        let incident_type = valid.incident_type;
        let body = serde_json::to_value(IncidentReportBody::new(valid, owner))?;
        let id = self
            .store
            .add_document(&reports_collection(&owner.id), body)
            .await?;

        // Only metadata; report content stays out of logs.
        tracing::info!(
            report_id = %id,
            owner = %owner.id,
            incident_type = %incident_type,
            "Incident report stored"
        );
        Ok(id)
    }
}
