//! Persisted incident report record.
//!
//! # Ownership
//!
//! A report belongs to exactly one identity and lives under that identity's
//! own collection. Reports are immutable once written and never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{IncidentType, ValidIncidentReport};
use crate::domain::foundation::{DocumentId, Identity, IdentityId, Timestamp};

/// Collection path holding the reports of one identity.
pub fn reports_collection(owner: &IdentityId) -> String {
    format!("users/{}/incident_reports", owner)
}

/// Document body written to the store for one report.
///
/// Timestamps are not part of the body; the store stamps them at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReportBody {
    pub incident_type: IncidentType,
    pub incident_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub description: String,
    pub user_id: IdentityId,
    pub anonymous: bool,
}

impl IncidentReportBody {
    /// Builds the body for a validated form written by `owner`.
    pub fn new(report: ValidIncidentReport, owner: &Identity) -> Self {
        Self {
            incident_type: report.incident_type,
            incident_date: report.incident_date,
            location: report.location,
            description: report.description,
            user_id: owner.id.clone(),
            anonymous: owner.is_anonymous,
        }
    }
}

/// Incident report as read back from the store.
///
/// # Invariants
///
/// - `description` is 10-5000 characters
/// - `incident_date` is between 1900-01-01 and the day it was filed
/// - `created_at == updated_at` (reports are never edited)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentReport {
    id: DocumentId,
    incident_type: IncidentType,
    incident_date: NaiveDate,
    location: Option<String>,
    description: String,
    user_id: IdentityId,
    anonymous: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl IncidentReport {
    /// Reconstitute a report from persistence (no validation).
    pub fn reconstitute(
        id: DocumentId,
        body: IncidentReportBody,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            incident_type: body.incident_type,
            incident_date: body.incident_date,
            location: body.location,
            description: body.description,
            user_id: body.user_id,
            anonymous: body.anonymous,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn incident_type(&self) -> IncidentType {
        self.incident_type
    }

    pub fn incident_date(&self) -> NaiveDate {
        self.incident_date
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn user_id(&self) -> &IdentityId {
        &self.user_id
    }

    /// True when filed by an anonymous identity.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }
}
