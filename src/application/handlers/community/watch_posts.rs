//! WatchPostsHandler - live snapshots of the community board.

use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};

use super::list_posts::decode_posts;
use crate::domain::community::{CommunityPost, COMMUNITY_POSTS_COLLECTION};
use crate::domain::submission::PersistenceError;
use crate::ports::{DocumentStore, QueryOrder};

/// Handler producing a stream of full board snapshots, newest post first.
///
/// The first item is the current board; one more follows every change.
pub struct WatchPostsHandler {
    store: Arc<dyn DocumentStore>,
}

impl WatchPostsHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
    ) -> Result<BoxStream<'static, Vec<CommunityPost>>, PersistenceError> {
        let snapshots = self
            .store
            .subscribe_collection(COMMUNITY_POSTS_COLLECTION, QueryOrder::CreatedAtDesc)
            .await?;
        Ok(snapshots.map(decode_posts).boxed())
    }
}
