//! HTTP routes for community board endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_post, list_posts, stream_posts, CommunityHandlers};

/// Creates the community router.
pub fn community_routes(handlers: CommunityHandlers) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/stream", get(stream_posts))
        .with_state(handlers)
}
