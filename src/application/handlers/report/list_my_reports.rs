//! ListMyReportsHandler - Query handler for the caller's own reports.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::Identity;
use crate::domain::report::{reports_collection, IncidentReport, IncidentReportBody};
use crate::domain::submission::PersistenceError;
use crate::ports::{DocumentStore, QueryOrder};

/// Query for the reports owned by the session's identity.
#[derive(Debug, Clone)]
pub struct ListMyReportsQuery {
    /// Identity of the session, if one was established.
    pub owner: Option<Identity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListMyReportsError {
    /// The session has never submitted anything, so it owns nothing.
    #[error("No identity established for this session")]
    NoIdentity,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Handler listing reports newest first.
pub struct ListMyReportsHandler {
    store: Arc<dyn DocumentStore>,
}

impl ListMyReportsHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListMyReportsQuery,
    ) -> Result<Vec<IncidentReport>, ListMyReportsError> {
        let owner = query.owner.ok_or(ListMyReportsError::NoIdentity)?;

        let documents = self
            .store
            .query_collection(&reports_collection(&owner.id), QueryOrder::CreatedAtDesc)
            .await?;

        documents
            .into_iter()
            .map(|doc| -> Result<IncidentReport, ListMyReportsError> {
                let body: IncidentReportBody = doc.decode()?;
                Ok(IncidentReport::reconstitute(
                    doc.id,
                    body,
                    doc.created_at,
                    doc.updated_at,
                ))
            })
            .collect()
    }
}
