//! HTTP DTOs for community board endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::community::{CommunityPost, CommunityPostForm};

/// New post as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl From<CreatePostRequest> for CommunityPostForm {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub replies: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CommunityPost> for PostResponse {
    fn from(post: &CommunityPost) -> Self {
        Self {
            id: post.id().to_string(),
            title: post.title().to_string(),
            content: post.content().to_string(),
            author: post.author().to_string(),
            replies: post.replies(),
            created_at: post.created_at().to_rfc3339(),
            updated_at: post.updated_at().to_rfc3339(),
        }
    }
}

/// The whole board, newest post first.
#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
}

impl From<Vec<CommunityPost>> for PostListResponse {
    fn from(posts: Vec<CommunityPost>) -> Self {
        Self {
            posts: posts.iter().map(PostResponse::from).collect(),
        }
    }
}
