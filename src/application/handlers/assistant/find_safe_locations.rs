//! FindSafeLocationsHandler - nearby police stations, fire stations, hospitals.

use std::sync::Arc;

use super::{AssistantError, StructuredCompletion};
use crate::domain::assistant::{
    CompletionTemplate, SafeLocation, SafeLocationsRequest, SafeLocationsTemplate, ToolOutcome,
};
use crate::domain::foundation::ClientSessionId;
use crate::ports::RequestMetadata;

#[derive(Debug, Clone)]
pub struct FindSafeLocationsCommand {
    pub user_location: String,
    pub client_session: Option<ClientSessionId>,
    pub trace_id: String,
}

pub struct FindSafeLocationsHandler {
    completion: Arc<StructuredCompletion>,
}

impl FindSafeLocationsHandler {
    pub fn new(completion: Arc<StructuredCompletion>) -> Self {
        Self { completion }
    }

    pub async fn handle(
        &self,
        cmd: FindSafeLocationsCommand,
    ) -> Result<ToolOutcome<SafeLocation>, AssistantError> {
        let request = SafeLocationsRequest::new(&cmd.user_location)?;

        let mut metadata = RequestMetadata::new(SafeLocationsTemplate::NAME, cmd.trace_id);
        if let Some(session) = cmd.client_session {
            metadata = metadata.with_client_session(session);
        }

        Ok(self
            .completion
            .run::<SafeLocationsTemplate>(&request, metadata)
            .await?)
    }
}
