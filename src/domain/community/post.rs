//! Community board post record.
//!
//! Posts are readable by everyone and always shown as written by
//! "Anonymous". The owning identity is written with the stored document for
//! attribution only and is never read back.

use serde::{Deserialize, Serialize};

use super::ValidCommunityPost;
use crate::domain::foundation::{DocumentId, Identity, IdentityId, Timestamp};

/// Shared collection holding every community post.
pub const COMMUNITY_POSTS_COLLECTION: &str = "community_posts";

/// Author name displayed on every post.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Document body written to the store for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPostBody {
    pub title: String,
    pub content: String,
    pub author: String,
    pub user_id: IdentityId,
    #[serde(default)]
    pub replies: u32,
}

impl CommunityPostBody {
    pub fn new(post: ValidCommunityPost, owner: &Identity) -> Self {
        Self {
            title: post.title,
            content: post.content,
            author: ANONYMOUS_AUTHOR.to_string(),
            user_id: owner.id.clone(),
            replies: 0,
        }
    }
}

/// Community post as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityPost {
    id: DocumentId,
    title: String,
    content: String,
    author: String,
    replies: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl CommunityPost {
    /// Reconstitute a post from persistence (no validation).
    pub fn reconstitute(
        id: DocumentId,
        body: CommunityPostBody,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: body.title,
            content: body.content,
            author: body.author,
            replies: body.replies,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Number of replies; the board does not support replying yet.
    pub fn replies(&self) -> u32 {
        self.replies
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Identity {
        Identity::anonymous(IdentityId::new("anon-7").unwrap())
    }

    fn valid() -> ValidCommunityPost {
        ValidCommunityPost {
            title: "Finding my voice".to_string(),
            content: "It took a long time, but I am here.".to_string(),
        }
    }

    #[test]
    fn new_body_is_anonymous_with_no_replies() {
        let body = CommunityPostBody::new(valid(), &owner());
        assert_eq!(body.author, "Anonymous");
        assert_eq!(body.replies, 0);
        assert_eq!(body.user_id, owner().id);
    }

    #[test]
    fn body_without_replies_field_defaults_to_zero() {
        let json = serde_json::json!({
            "title": "Finding my voice",
            "content": "It took a long time, but I am here.",
            "author": "Anonymous",
            "userId": "anon-7"
        });
        let body: CommunityPostBody = serde_json::from_value(json).unwrap();
        assert_eq!(body.replies, 0);
    }

    #[test]
    fn reconstituted_post_is_shown_anonymously() {
        let now = Timestamp::now();
        let post = CommunityPost::reconstitute(
            DocumentId::generate(),
            CommunityPostBody::new(valid(), &owner()),
            now,
            now,
        );
        assert_eq!(post.title(), "Finding my voice");
        assert_eq!(post.author(), ANONYMOUS_AUTHOR);
        assert_eq!(post.replies(), 0);
    }
}
