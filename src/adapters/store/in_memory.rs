//! In-memory document store for tests and local development.
//!
//! Collections live in a `HashMap` keyed by path. Every write broadcasts the
//! changed path; subscriptions re-read the whole collection on each matching
//! change and emit it as a fresh snapshot.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(InMemoryDocumentStore::new());
//! store.add_document("community_posts", json!({"title": "Hi"})).await?;
//! assert_eq!(store.document_count("community_posts").await, 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;

use crate::domain::foundation::{DocumentId, Timestamp};
use crate::domain::submission::PersistenceError;
use crate::ports::{validate_collection_path, DocumentStore, QueryOrder, StoredDocument};

/// Pending notifications per subscriber before it lags and resyncs.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

type Collections = Arc<RwLock<HashMap<String, Vec<StoredDocument>>>>;

/// In-memory document store.
pub struct InMemoryDocumentStore {
    collections: Collections,
    changes: broadcast::Sender<String>,
    /// Error returned by every write while set
    write_failure: Mutex<Option<PersistenceError>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            changes,
            write_failure: Mutex::new(None),
        }
    }

    // === Test Helpers ===

    /// Makes every subsequent write fail with `error`.
    pub fn fail_writes(&self, error: PersistenceError) {
        *self.write_failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Lets writes succeed again.
    pub fn restore_writes(&self) {
        *self.write_failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of documents in a collection.
    pub async fn document_count(&self, path: &str) -> usize {
        self.collections
            .read()
            .await
            .get(path)
            .map_or(0, Vec::len)
    }

    /// Paths of every non-empty collection, sorted.
    pub async fn collection_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.collections.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

async fn snapshot(collections: &Collections, path: &str, order: QueryOrder) -> Vec<StoredDocument> {
    let mut documents = collections
        .read()
        .await
        .get(path)
        .cloned()
        .unwrap_or_default();
    order.sort(&mut documents);
    documents
}

/// A write time strictly after `latest`, so insertion order is total.
fn next_stamp(latest: Option<&StoredDocument>) -> Timestamp {
    let now = Timestamp::now();
    match latest {
        Some(doc) if !doc.created_at.is_before(&now) => Timestamp::from_datetime(
            *doc.created_at.as_datetime() + chrono::Duration::microseconds(1),
        ),
        _ => now,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add_document(
        &self,
        path: &str,
        document: Value,
    ) -> Result<DocumentId, PersistenceError> {
        validate_collection_path(path)?;
        let forced = self
            .write_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }
        if !document.is_object() {
            return Err(PersistenceError::rejected("document body must be a JSON object"));
        }

        let id = DocumentId::generate();
        {
            let mut collections = self.collections.write().await;
            let collection = collections.entry(path.to_string()).or_default();
            let stamp = next_stamp(collection.last());
            collection.push(StoredDocument {
                id: id.clone(),
                data: document,
                created_at: stamp,
                updated_at: stamp,
            });
        }

        // No receivers is fine
        let _ = self.changes.send(path.to_string());
        Ok(id)
    }

    async fn query_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<Vec<StoredDocument>, PersistenceError> {
        validate_collection_path(path)?;
        Ok(snapshot(&self.collections, path, order).await)
    }

    async fn subscribe_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<BoxStream<'static, Vec<StoredDocument>>, PersistenceError> {
        validate_collection_path(path)?;

        // Subscribe before reading so no write falls between the two.
        let changes = self.changes.subscribe();
        let initial = snapshot(&self.collections, path, order).await;
        let collections = Arc::clone(&self.collections);
        let path = path.to_string();

        let snapshots = stream::unfold(
            (Some(initial), changes),
            move |(pending, mut changes)| {
                let collections = Arc::clone(&collections);
                let path = path.clone();
                async move {
                    if let Some(initial) = pending {
                        return Some((initial, (None, changes)));
                    }
                    loop {
                        match changes.recv().await {
                            Ok(changed) if changed == path => break,
                            Ok(_) => continue,
                            // Missed notifications; a full snapshot covers them.
                            Err(RecvError::Lagged(_)) => break,
                            Err(RecvError::Closed) => return None,
                        }
                    }
                    let next = snapshot(&collections, &path, order).await;
                    Some((next, (None, changes)))
                }
            },
        );

        Ok(snapshots.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn add_then_query_returns_document_with_stamps() {
        let store = InMemoryDocumentStore::new();

        let id = store
            .add_document("community_posts", json!({"title": "Hi"}))
            .await
            .unwrap();
        let docs = store
            .query_collection("community_posts", QueryOrder::CreatedAtDesc)
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].data["title"], "Hi");
        assert_eq!(docs[0].created_at, docs[0].updated_at);
    }

    #[tokio::test]
    async fn rapid_writes_keep_insertion_order() {
        let store = InMemoryDocumentStore::new();
        for n in 0..5 {
            store.add_document("c", json!({"n": n})).await.unwrap();
        }

        let newest_first = store.query_collection("c", QueryOrder::CreatedAtDesc).await.unwrap();
        let ns: Vec<i64> = newest_first.iter().map(|d| d.data["n"].as_i64().unwrap()).collect();

        assert_eq!(ns, vec![4, 3, 2, 1, 0]);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store.add_document("users/a/incident_reports", json!({})).await.unwrap();

        assert_eq!(store.document_count("users/a/incident_reports").await, 1);
        assert_eq!(store.document_count("users/b/incident_reports").await, 0);
    }

    #[tokio::test]
    async fn forced_failure_rejects_writes_until_restored() {
        let store = InMemoryDocumentStore::new();
        store.fail_writes(PersistenceError::unavailable("offline"));

        let result = store.add_document("c", json!({})).await;
        assert!(matches!(result, Err(PersistenceError::Unavailable(_))));
        assert_eq!(store.document_count("c").await, 0);

        store.restore_writes();
        assert!(store.add_document("c", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(
            store.add_document("c", json!([1, 2])).await,
            Err(PersistenceError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn invalid_paths_are_rejected() {
        let store = InMemoryDocumentStore::new();
        assert!(store.add_document("users//x", json!({})).await.is_err());
        assert!(store.query_collection("", QueryOrder::default()).await.is_err());
    }

    #[tokio::test]
    async fn subscription_ignores_other_collections() {
        let store = InMemoryDocumentStore::new();
        let mut snapshots = store
            .subscribe_collection("community_posts", QueryOrder::CreatedAtDesc)
            .await
            .unwrap();
        assert!(snapshots.next().await.unwrap().is_empty());

        store.add_document("other", json!({})).await.unwrap();
        store.add_document("community_posts", json!({"title": "A"})).await.unwrap();

        let next = tokio::time::timeout(Duration::from_secs(1), snapshots.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].data["title"], "A");
    }
}
