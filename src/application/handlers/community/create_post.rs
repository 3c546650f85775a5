//! PostSubmission - persists validated community posts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::Submission;
use crate::domain::community::{
    CommunityPostBody, CommunityPostForm, ValidCommunityPost, COMMUNITY_POSTS_COLLECTION,
};
use crate::domain::foundation::{DocumentId, FieldErrors, Identity};
use crate::domain::submission::PersistenceError;
use crate::ports::DocumentStore;

/// Submission of posts to the shared community board.
pub struct PostSubmission {
    store: Arc<dyn DocumentStore>,
}

impl PostSubmission {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Submission for PostSubmission {
    type Form = CommunityPostForm;
    type Valid = ValidCommunityPost;

    const KIND: &'static str = "community_post";

    fn validate(&self, form: &CommunityPostForm) -> Result<ValidCommunityPost, FieldErrors> {
        form.validate()
    }

    async fn persist(
        &self,
        valid: ValidCommunityPost,
        owner: &Identity,
    ) -> Result<DocumentId, PersistenceError> {
        let body = serde_json::to_value(CommunityPostBody::new(valid, owner))?;
        let id = self
            .store
            .add_document(COMMUNITY_POSTS_COLLECTION, body)
            .await?;
        tracing::info!(post_id = %id, owner = %owner.id, "Community post stored");
        Ok(id)
    }
}
