//! ChatHandler - one ZindukaBot turn.
//!
//! Only the latest user message is sent; the bot keeps no history.

use std::sync::Arc;

use super::{AssistantError, StructuredCompletion};
use crate::domain::assistant::{
    ChatReply, ChatRequest, ChatTemplate, CompletionTemplate, ZINDUKA_GREETING,
};
use crate::domain::foundation::ClientSessionId;
use crate::ports::RequestMetadata;

#[derive(Debug, Clone)]
pub struct ChatCommand {
    pub message: String,
    pub client_session: Option<ClientSessionId>,
    pub trace_id: String,
}

pub struct ChatHandler {
    completion: Arc<StructuredCompletion>,
}

impl ChatHandler {
    pub fn new(completion: Arc<StructuredCompletion>) -> Self {
        Self { completion }
    }

    /// Greeting shown when a conversation opens.
    pub fn greeting(&self) -> &'static str {
        ZINDUKA_GREETING
    }

    pub async fn handle(&self, cmd: ChatCommand) -> Result<ChatReply, AssistantError> {
        let request = ChatRequest::new(&cmd.message)?;

        let mut metadata = RequestMetadata::new(ChatTemplate::NAME, cmd.trace_id);
        if let Some(session) = cmd.client_session {
            metadata = metadata.with_client_session(session);
        }

        Ok(self.completion.run::<ChatTemplate>(&request, metadata).await?)
    }
}
