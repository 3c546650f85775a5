//! FindSupportHandler - resource referral for a location and need.

use std::sync::Arc;

use super::{AssistantError, StructuredCompletion};
use crate::domain::assistant::{
    CompletionTemplate, ReferralRequest, ReferralTemplate, ResourceRecommendation, ToolOutcome,
};
use crate::domain::foundation::ClientSessionId;
use crate::ports::RequestMetadata;

/// Command to look up support resources.
#[derive(Debug, Clone)]
pub struct FindSupportCommand {
    pub location: String,
    pub needs: String,
    pub client_session: Option<ClientSessionId>,
    pub trace_id: String,
}

pub struct FindSupportHandler {
    completion: Arc<StructuredCompletion>,
}

impl FindSupportHandler {
    pub fn new(completion: Arc<StructuredCompletion>) -> Self {
        Self { completion }
    }

    pub async fn handle(
        &self,
        cmd: FindSupportCommand,
    ) -> Result<ToolOutcome<ResourceRecommendation>, AssistantError> {
        let request = ReferralRequest::new(&cmd.location, &cmd.needs)?;

        let mut metadata = RequestMetadata::new(ReferralTemplate::NAME, cmd.trace_id);
        if let Some(session) = cmd.client_session {
            metadata = metadata.with_client_session(session);
        }

        Ok(self
            .completion
            .run::<ReferralTemplate>(&request, metadata)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::handlers::assistant::CompletionSettings;

    fn handler(provider: MockAIProvider) -> FindSupportHandler {
        FindSupportHandler::new(Arc::new(StructuredCompletion::new(
            Arc::new(provider),
            CompletionSettings::default(),
        )))
    }

    fn command(location: &str, needs: &str) -> FindSupportCommand {
        FindSupportCommand {
            location: location.to_string(),
            needs: needs.to_string(),
            client_session: None,
            trace_id: "trace-1".to_string(),
        }
    }

    #[tokio::test]
    async fn nairobi_shelter_query_returns_hope_house() {
        let provider =
            MockAIProvider::new().with_response(r#"[{"name":"Hope House","address":"123 Elm St"}]"#);

        let outcome = handler(provider)
            .handle(command("Nairobi", "emergency shelter"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ToolOutcome::Found(vec![ResourceRecommendation {
                name: "Hope House".to_string(),
                address: "123 Elm St".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_provider() {
        let provider = MockAIProvider::new();
        let err = handler(provider.clone())
            .handle(command("", "shelter please"))
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::Invalid(ref e) if e.contains("location")));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_address_is_completion_error() {
        let provider = MockAIProvider::new().with_response(r#"[{"name":"Hope House"}]"#);
        let err = handler(provider)
            .handle(command("Nairobi", "emergency shelter"))
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::Completion(_)));
    }
}
