//! HTTP adapters - REST API implementations.
//!
//! Each area has its own dto/handlers/routes module; [`app_router`] nests
//! them under `/api` behind the client session middleware.

pub mod assistant;
pub mod community;
pub mod error;
pub mod middleware;
pub mod report;
pub mod session;
pub mod submission;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::application::handlers::{
    ChatHandler, FindSafeLocationsHandler, FindSupportHandler, ListMyReportsHandler,
    ListPostsHandler, StructuredCompletion, WatchPostsHandler,
};
use crate::application::ClientSessionRegistry;
use crate::ports::DocumentStore;

pub use assistant::{assistant_routes, AssistantHandlers};
pub use community::{community_routes, CommunityHandlers};
pub use error::{ApiError, ErrorResponse};
pub use middleware::{RateLimiterState, CLIENT_SESSION_HEADER};
pub use report::{report_routes, ReportHandlers};
pub use session::session_routes;

/// Everything the HTTP layer needs.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ClientSessionRegistry>,
    pub store: Arc<dyn DocumentStore>,
    pub completion: Arc<StructuredCompletion>,
    pub rate_limiter: RateLimiterState,
}

impl AppState {
    pub fn report_handlers(&self) -> ReportHandlers {
        ReportHandlers::new(Arc::new(ListMyReportsHandler::new(Arc::clone(&self.store))))
    }

    pub fn community_handlers(&self) -> CommunityHandlers {
        CommunityHandlers::new(
            Arc::new(ListPostsHandler::new(Arc::clone(&self.store))),
            Arc::new(WatchPostsHandler::new(Arc::clone(&self.store))),
        )
    }

    pub fn assistant_handlers(&self) -> AssistantHandlers {
        AssistantHandlers::new(
            Arc::new(FindSupportHandler::new(Arc::clone(&self.completion))),
            Arc::new(FindSafeLocationsHandler::new(Arc::clone(&self.completion))),
            Arc::new(ChatHandler::new(Arc::clone(&self.completion))),
        )
    }
}

/// Builds the full application router.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/session", session_routes())
        .nest("/reports", report_routes(state.report_handlers()))
        .nest("/community", community_routes(state.community_handlers()))
        .nest(
            "/assistant",
            assistant_routes(state.assistant_handlers(), state.rate_limiter.clone()),
        )
        .layer(from_fn_with_state(
            Arc::clone(&state.sessions),
            middleware::client_session_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

/// GET /health - Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
