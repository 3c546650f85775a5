//! ListPostsHandler - Query handler for the community board.

use std::sync::Arc;

use crate::domain::community::{CommunityPost, CommunityPostBody, COMMUNITY_POSTS_COLLECTION};
use crate::domain::submission::PersistenceError;
use crate::ports::{DocumentStore, QueryOrder, StoredDocument};

/// Handler listing every post, newest first.
pub struct ListPostsHandler {
    store: Arc<dyn DocumentStore>,
}

impl ListPostsHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<CommunityPost>, PersistenceError> {
        let documents = self
            .store
            .query_collection(COMMUNITY_POSTS_COLLECTION, QueryOrder::CreatedAtDesc)
            .await?;
        Ok(decode_posts(documents))
    }
}

/// Decodes a snapshot of the board, skipping documents that are not posts.
pub(super) fn decode_posts(documents: Vec<StoredDocument>) -> Vec<CommunityPost> {
    documents
        .into_iter()
        .filter_map(|doc| match doc.decode::<CommunityPostBody>() {
            Ok(body) => Some(CommunityPost::reconstitute(
                doc.id,
                body,
                doc.created_at,
                doc.updated_at,
            )),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed community post");
                None
            }
        })
        .collect()
}
