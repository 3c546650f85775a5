//! StructuredCompletion - one typed round trip to the completion service.
//!
//! Renders a [`CompletionTemplate`], sends it once under a deadline and
//! decodes the reply with the template's strict parser. There are no
//! retries: a failure is reported to the caller as-is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::assistant::{CompletionError, CompletionTemplate};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// System instruction sent with every tool prompt; all templates decode JSON.
pub const JSON_ONLY_SYSTEM_PROMPT: &str =
    "Answer with a single JSON value only. Do not add prose or Markdown around it.";

/// Default deadline for one completion.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every assistant tool.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_COMPLETION_TIMEOUT,
            max_tokens: 1024,
            temperature: 0.3,
        }
    }
}

/// Runs completion templates against a provider.
pub struct StructuredCompletion {
    provider: Arc<dyn AIProvider>,
    settings: CompletionSettings,
}

impl StructuredCompletion {
    pub fn new(provider: Arc<dyn AIProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Renders, sends and decodes one request.
    pub async fn run<T: CompletionTemplate>(
        &self,
        request: &T::Request,
        metadata: RequestMetadata,
    ) -> Result<T::Output, CompletionError> {
        let completion = CompletionRequest::new(metadata)
            .with_system_prompt(JSON_ONLY_SYSTEM_PROMPT)
            .with_message(MessageRole::User, T::render(request))
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        let started = Instant::now();
        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(completion))
            .await
            .map_err(|_| {
                tracing::warn!(tool = T::NAME, "Completion timed out");
                CompletionError::Timeout(self.settings.timeout)
            })?
            .map_err(|err| {
                tracing::warn!(tool = T::NAME, error = %err, transient = err.is_transient(), "Completion failed");
                CompletionError::from(err)
            })?;

        let provider = self.provider.provider_info();
        tracing::info!(
            tool = T::NAME,
            provider = %provider.name,
            model = %response.model,
            finish_reason = ?response.finish_reason,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completion received"
        );

        T::parse(&response.content).map_err(|err| {
            tracing::warn!(tool = T::NAME, error = %err, "Completion did not match schema");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::assistant::{ReferralRequest, ReferralTemplate, ToolOutcome};

    fn completion(provider: MockAIProvider, timeout: Duration) -> StructuredCompletion {
        StructuredCompletion::new(
            Arc::new(provider),
            CompletionSettings {
                timeout,
                ..CompletionSettings::default()
            },
        )
    }

    fn request() -> ReferralRequest {
        ReferralRequest::new("Nairobi", "emergency shelter").unwrap()
    }

    #[tokio::test]
    async fn sends_rendered_prompt_once_and_decodes() {
        let provider =
            MockAIProvider::new().with_response(r#"[{"name":"Hope House","address":"123 Elm St"}]"#);
        let runner = completion(provider.clone(), Duration::from_secs(5));

        let outcome = runner
            .run::<ReferralTemplate>(&request(), RequestMetadata::new("test", "trace"))
            .await
            .unwrap();

        assert_eq!(outcome.into_items()[0].name, "Hope House");
        assert_eq!(provider.call_count(), 1);
        let sent = &provider.get_calls()[0];
        assert!(sent.last_user_message().unwrap().contains("Location: Nairobi"));
        assert_eq!(sent.system_prompt.as_deref(), Some(JSON_ONLY_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn provider_error_is_not_retried() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Unavailable {
                message: "overloaded".to_string(),
            })
            .with_response("[]");
        let runner = completion(provider.clone(), Duration::from_secs(5));

        let err = runner
            .run::<ReferralTemplate>(&request(), RequestMetadata::new("test", "trace"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Provider(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = MockAIProvider::new()
            .with_response("[]")
            .with_delay(Duration::from_millis(200));
        let runner = completion(provider, Duration::from_millis(20));

        let err = runner
            .run::<ReferralTemplate>(&request(), RequestMetadata::new("test", "trace"))
            .await
            .unwrap_err();

        assert_eq!(err, CompletionError::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn schema_violation_is_invalid_response() {
        let provider = MockAIProvider::new().with_response(r#"[{"name":"Hope House"}]"#);
        let runner = completion(provider, Duration::from_secs(5));

        let err = runner
            .run::<ReferralTemplate>(&request(), RequestMetadata::new("test", "trace"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let provider = MockAIProvider::new().with_response(r#"{"resourceRecommendations":[]}"#);
        let runner = completion(provider, Duration::from_secs(5));

        let outcome = runner
            .run::<ReferralTemplate>(&request(), RequestMetadata::new("test", "trace"))
            .await
            .unwrap();

        assert_eq!(outcome, ToolOutcome::Empty);
    }
}
