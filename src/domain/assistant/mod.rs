//! Assistant module - Prompt templates and typed results for the AI tools.
//!
//! Three tools share one shape: a validated request is rendered through a
//! fixed [`CompletionTemplate`], the completion service is asked once, and
//! the reply is decoded strictly into the tool's output type.
//!
//! | Tool | Request | Output |
//! |------|---------|--------|
//! | Resource referral | [`ReferralRequest`] | [`ToolOutcome`] of [`ResourceRecommendation`] |
//! | Safe locations | [`SafeLocationsRequest`] | [`ToolOutcome`] of [`SafeLocation`] |
//! | ZindukaBot | [`ChatRequest`] | [`ChatReply`] |

mod chat;
mod errors;
mod json;
mod referral;
mod safe_locations;
mod template;

pub use chat::{
    ChatReply, ChatRequest, ChatTemplate, CHAT_FAILURE_REPLY, CHAT_MESSAGE_MAX_CHARS,
    ZINDUKA_GREETING,
};
pub use errors::CompletionError;
pub use json::extract_json;
pub use referral::{ReferralRequest, ReferralTemplate, ResourceRecommendation};
pub use safe_locations::{SafeLocation, SafeLocationsRequest, SafeLocationsTemplate};
pub use template::{CompletionTemplate, ToolOutcome};
