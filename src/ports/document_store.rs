//! Document store port - keyed collections with query and live updates.
//!
//! Collections are addressed by slash-separated paths such as
//! `community_posts` or `users/{id}/incident_reports`. Document bodies are
//! opaque JSON; the store assigns ids and creation/update timestamps.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::{DocumentId, Timestamp};
use crate::domain::submission::PersistenceError;

/// Port for the external document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Adds a document to a collection and returns its new id.
    ///
    /// `created_at` and `updated_at` are both set to the write time.
    async fn add_document(&self, path: &str, document: Value)
        -> Result<DocumentId, PersistenceError>;

    /// Returns every document in a collection.
    async fn query_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<Vec<StoredDocument>, PersistenceError>;

    /// Streams a full snapshot of a collection now and after every change.
    async fn subscribe_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<BoxStream<'static, Vec<StoredDocument>>, PersistenceError>;
}

/// Sort order for collection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryOrder {
    /// Oldest first.
    CreatedAtAsc,
    /// Newest first.
    #[default]
    CreatedAtDesc,
}

impl QueryOrder {
    /// Sorts documents in place.
    pub fn sort(&self, documents: &mut [StoredDocument]) {
        match self {
            QueryOrder::CreatedAtAsc => documents.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            QueryOrder::CreatedAtDesc => documents.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }

    /// SQL fragment for this order.
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryOrder::CreatedAtAsc => "created_at ASC",
            QueryOrder::CreatedAtDesc => "created_at DESC",
        }
    }
}

/// A document as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StoredDocument {
    /// Decodes the document body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PersistenceError> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            PersistenceError::serialization(format!("document {}: {}", self.id, e))
        })
    }
}

/// Validates a collection path: non-empty segments, no leading/trailing slash.
pub fn validate_collection_path(path: &str) -> Result<(), PersistenceError> {
    if path.is_empty() || path.split('/').any(|segment| segment.trim().is_empty()) {
        return Err(PersistenceError::rejected(format!(
            "invalid collection path '{}'",
            path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn doc(secs: u64) -> StoredDocument {
        let ts = Timestamp::from_unix_secs(secs);
        StoredDocument {
            id: DocumentId::generate(),
            data: json!({ "n": secs }),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn desc_order_puts_newest_first() {
        let mut docs = vec![doc(1), doc(3), doc(2)];
        QueryOrder::CreatedAtDesc.sort(&mut docs);
        let order: Vec<u64> = docs.iter().map(|d| d.created_at.as_unix_secs()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn asc_order_puts_oldest_first() {
        let mut docs = vec![doc(2), doc(1)];
        QueryOrder::CreatedAtAsc.sort(&mut docs);
        assert_eq!(docs[0].created_at.as_unix_secs(), 1);
    }

    #[test]
    fn decode_reads_typed_body() {
        #[derive(Deserialize)]
        struct Body {
            n: u64,
        }
        let body: Body = doc(7).decode().unwrap();
        assert_eq!(body.n, 7);
    }

    #[test]
    fn decode_failure_is_a_serialization_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Body {
            missing: String,
        }
        assert!(matches!(
            doc(1).decode::<Body>(),
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn collection_paths_are_validated() {
        assert!(validate_collection_path("community_posts").is_ok());
        assert!(validate_collection_path("users/abc/incident_reports").is_ok());
        assert!(validate_collection_path("").is_err());
        assert!(validate_collection_path("users//incident_reports").is_err());
        assert!(validate_collection_path("/community_posts").is_err());
    }
}
