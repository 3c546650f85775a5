//! HTTP adapter for the AI assistant tools.
//!
//! - `POST /api/assistant/referrals` - Resource referral
//! - `POST /api/assistant/safe-locations` - Safe-location lookup
//! - `POST /api/assistant/chat` - ZindukaBot
//! - `GET /api/assistant/chat/greeting` - ZindukaBot's opening message

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatMessageRequest, ChatReplyResponse, FindSafeLocationsRequest, FindSafeLocationsResponse,
    FindSupportRequest, FindSupportResponse, GreetingResponse, ToolStatus,
};
pub use handlers::{AssistantHandlers, COMPLETION_FAILURE_MESSAGE};
pub use routes::assistant_routes;
