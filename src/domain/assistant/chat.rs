//! ZindukaBot: a supportive chatbot that points users to app sections.
//!
//! Each turn is independent; only the latest user message is sent.

use serde::{Deserialize, Serialize};

use super::json::{parse_object, require_text};
use super::{CompletionError, CompletionTemplate};
use crate::domain::foundation::{FieldErrors, ValidationError};

/// Upper bound on a single chat message, in characters.
pub const CHAT_MESSAGE_MAX_CHARS: usize = 2000;

/// First message shown when a conversation opens.
pub const ZINDUKA_GREETING: &str = "Hello! I am ZindukaBot. \"Zinduka\" means \"Rise Up\". \
I'm here to offer a listening ear and help you find your way around the app. How are you feeling today?";

/// Reply shown when the completion service fails.
pub const CHAT_FAILURE_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

/// Validated user chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    pub fn new(message: &str) -> Result<Self, FieldErrors> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }
        let len = trimmed.chars().count();
        if len > CHAT_MESSAGE_MAX_CHARS {
            return Err(ValidationError::too_long("message", CHAT_MESSAGE_MAX_CHARS, len).into());
        }
        Ok(Self {
            message: trimmed.to_string(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The bot's answer to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Template for ZindukaBot.
pub struct ChatTemplate;

const PERSONA: &str = r#"You are ZindukaBot, a caring and empathetic chatbot for the SafeHaven platform. Your name is "ZindukaBot". Your purpose is to provide emotional support and guide users to the resources available in the app.

Your personality is:
- Warm, patient, and non-judgmental.
- A good listener.
- Empowering and encouraging.
- Always ready to help.

Your primary functions are:
1. Offer Emotional Support: Listen to the user's feelings and validate their experiences with kindness. Use phrases like "I'm here for you," "That sounds incredibly difficult," or "Thank you for sharing that with me."
2. Suggest App Features: When appropriate, gently guide the user to helpful sections of the SafeHaven app. Do not give external advice or links.

Here are the app's features you can suggest:
- Emergency Guidance (/emergency): For users in immediate crisis. Mention this if the user expresses fear for their safety.
- Find Support (/find-support): To find local shelters, counselors, and aid. Suggest this if the user needs professional help or a safe place.
- Report an Incident (/report-incident): For anonymously documenting an event.
- Know Your Rights (/legal-rights): For legal information.
- Safe Locations (/safe-locations): To find nearby safe public places like police stations or hospitals.
- Community Board (/community): A safe, anonymous place to connect with others.

Interaction Rules:
- NEVER give medical, legal, or psychological advice directly. Always refer to the app's features.
- If the user asks for something outside your scope, gently say, "I'm here to offer support and help you use the SafeHaven app. For other questions, it's best to consult a professional, which you may be able to find through our 'Find Support' tool."
- Keep your replies concise and easy to understand."#;

impl CompletionTemplate for ChatTemplate {
    type Request = ChatRequest;
    type Output = ChatReply;

    const NAME: &'static str = "zinduka_chat";

    fn render(request: &ChatRequest) -> String {
        format!(
            "{persona}\n\n\
             Respond with JSON only, in exactly this shape: {{\"reply\": \"<your reply>\"}}\n\n\
             User's message: {message}\n\n\
             Your reply:",
            persona = PERSONA,
            message = request.message,
        )
    }

    fn parse(reply: &str) -> Result<ChatReply, CompletionError> {
        let parsed = parse_object::<ChatReply>(reply)?;
        require_text("reply", &parsed.reply)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_introduces_the_bot() {
        assert!(ZINDUKA_GREETING.starts_with("Hello! I am ZindukaBot."));
        assert!(ZINDUKA_GREETING.contains("\"Rise Up\""));
        assert!(ZINDUKA_GREETING.ends_with("How are you feeling today?"));
    }

    #[test]
    fn blank_message_is_rejected() {
        let errors = ChatRequest::new("   ").unwrap_err();
        assert!(errors.contains("message"));
    }

    #[test]
    fn overlong_message_is_rejected() {
        let long = "a".repeat(CHAT_MESSAGE_MAX_CHARS + 1);
        assert!(ChatRequest::new(&long).is_err());
    }

    #[test]
    fn prompt_lists_app_sections_and_message() {
        let prompt = ChatTemplate::render(&ChatRequest::new("I feel scared").unwrap());
        for section in [
            "/emergency",
            "/find-support",
            "/report-incident",
            "/legal-rights",
            "/safe-locations",
            "/community",
        ] {
            assert!(prompt.contains(section), "missing {}", section);
        }
        assert!(prompt.contains("NEVER give medical, legal, or psychological advice"));
        assert!(prompt.contains("User's message: I feel scared"));
    }

    #[test]
    fn parses_json_reply() {
        let reply = ChatTemplate::parse(r#"{"reply":"I'm here for you."}"#).unwrap();
        assert_eq!(reply.reply, "I'm here for you.");
    }

    #[test]
    fn fenced_json_reply_is_accepted() {
        let reply = ChatTemplate::parse("```json\n{\"reply\":\"You are safe here.\"}\n```").unwrap();
        assert_eq!(reply.reply, "You are safe here.");
    }

    #[test]
    fn plain_text_reply_is_a_completion_error() {
        assert!(matches!(
            ChatTemplate::parse("  I'm here for you.  "),
            Err(CompletionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn prose_with_brackets_is_rejected_like_any_prose() {
        for reply in [
            "I'm here for you [always].",
            "Try the Community Board {it helps}.",
            "I'm here for you.",
        ] {
            assert!(
                matches!(ChatTemplate::parse(reply), Err(CompletionError::InvalidResponse(_))),
                "accepted {:?}",
                reply
            );
        }
    }

    #[test]
    fn json_without_reply_field_is_a_completion_error() {
        assert!(matches!(
            ChatTemplate::parse(r#"{"message":"hi"}"#),
            Err(CompletionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn empty_reply_is_a_completion_error() {
        assert!(ChatTemplate::parse("   ").is_err());
    }
}
