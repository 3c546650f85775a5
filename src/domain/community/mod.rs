//! Community module - Anonymous support board posts.

mod form;
mod post;

pub use form::{CommunityPostForm, ValidCommunityPost, CONTENT_MIN_CHARS, TITLE_MIN_CHARS};
pub use post::{
    CommunityPost, CommunityPostBody, ANONYMOUS_AUTHOR, COMMUNITY_POSTS_COLLECTION,
};
