//! HTTP adapter for the community board.
//!
//! - `POST /api/community/posts` - Publish a post as "Anonymous"
//! - `GET /api/community/posts` - Current board, newest first
//! - `GET /api/community/posts/stream` - Live board as server-sent events

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatePostRequest, PostListResponse, PostResponse};
pub use handlers::{CommunityHandlers, POSTS_EVENT};
pub use routes::community_routes;
