//! HTTP routes for the assistant tools.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{chat, chat_greeting, find_safe_locations, find_support, AssistantHandlers};
use crate::adapters::http::middleware::{assistant_rate_limit, RateLimiterState};

/// Creates the assistant router.
///
/// Only the routes that reach the completion service are rate limited.
pub fn assistant_routes(handlers: AssistantHandlers, limiter: RateLimiterState) -> Router {
    let limited = Router::new()
        .route("/referrals", post(find_support))
        .route("/safe-locations", post(find_safe_locations))
        .route("/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(limiter, assistant_rate_limit));

    Router::new()
        .route("/chat/greeting", get(chat_greeting))
        .merge(limited)
        .with_state(handlers)
}
