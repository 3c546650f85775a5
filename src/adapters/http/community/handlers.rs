//! HTTP handlers for community board endpoints.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::StoredSession;
use crate::adapters::http::submission::run_detached;
use crate::application::handlers::{ListPostsHandler, WatchPostsHandler};
use crate::domain::community::{CommunityPost, CommunityPostForm};
use crate::domain::foundation::ErrorCode;
use crate::domain::submission::PersistenceError;

use super::dto::{CreatePostRequest, PostListResponse};

/// SSE event name carrying a board snapshot.
pub const POSTS_EVENT: &str = "posts";

#[derive(Clone)]
pub struct CommunityHandlers {
    list_handler: Arc<ListPostsHandler>,
    watch_handler: Arc<WatchPostsHandler>,
}

impl CommunityHandlers {
    pub fn new(list_handler: Arc<ListPostsHandler>, watch_handler: Arc<WatchPostsHandler>) -> Self {
        Self {
            list_handler,
            watch_handler,
        }
    }
}

/// POST /api/community/posts - Publish an anonymous post
pub async fn create_post(
    StoredSession(session): StoredSession,
    req: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req?;
    let form = CommunityPostForm::from(req);
    Ok(run_detached(async move { session.posts().submit(form).await }).await)
}

/// GET /api/community/posts - Current board
pub async fn list_posts(State(handlers): State<CommunityHandlers>) -> Response {
    match handlers.list_handler.handle().await {
        Ok(posts) => (StatusCode::OK, Json(PostListResponse::from(posts))).into_response(),
        Err(e) => board_unavailable(e),
    }
}

/// GET /api/community/posts/stream - Board snapshots as server-sent events
///
/// The first event is the current board; another follows every new post.
pub async fn stream_posts(State(handlers): State<CommunityHandlers>) -> Response {
    match handlers.watch_handler.handle().await {
        Ok(snapshots) => Sse::new(snapshot_events(snapshots))
            .keep_alive(KeepAlive::default())
            .into_response(),
        Err(e) => board_unavailable(e),
    }
}

fn snapshot_events<S>(snapshots: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = Vec<CommunityPost>> + Send + 'static,
{
    snapshots.filter_map(|posts| async move {
        match Event::default()
            .event(POSTS_EVENT)
            .json_data(PostListResponse::from(posts))
        {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unserializable board snapshot");
                None
            }
        }
    })
}

fn board_unavailable(err: PersistenceError) -> Response {
    tracing::warn!(error = %err, "Community board unavailable");
    ApiError::new(
        StatusCode::BAD_GATEWAY,
        ErrorCode::PersistenceFailed,
        "Could not load the community board. Please try again.",
    )
    .into_response()
}
