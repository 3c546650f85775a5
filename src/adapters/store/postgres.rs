//! PostgreSQL implementation of DocumentStore.
//!
//! All collections share one `documents` table keyed by `collection_path`.
//! Each insert issues `pg_notify('document_changes', collection_path)` in the
//! same transaction; subscriptions listen on that channel and re-query the
//! collection when their path is named.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use sqlx::postgres::{PgListener, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DocumentId, Timestamp};
use crate::domain::submission::PersistenceError;
use crate::ports::{validate_collection_path, DocumentStore, QueryOrder, StoredDocument};

/// LISTEN/NOTIFY channel carrying changed collection paths.
pub const DOCUMENT_CHANGES_CHANNEL: &str = "document_changes";

/// PostgreSQL implementation of DocumentStore.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PersistenceError::unavailable(format!("migration failed: {}", e)))
    }

    async fn fetch_collection(
        pool: &PgPool,
        path: &str,
        order: QueryOrder,
    ) -> Result<Vec<StoredDocument>, PersistenceError> {
        let sql = format!(
            "SELECT id, data, created_at, updated_at FROM documents \
             WHERE collection_path = $1 ORDER BY {}, id",
            order.as_sql()
        );
        let rows = sqlx::query(&sql)
            .bind(path)
            .fetch_all(pool)
            .await
            .map_err(|e| map_sqlx_error("query collection", e))?;

        rows.into_iter().map(row_to_document).collect()
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn add_document(
        &self,
        path: &str,
        document: Value,
    ) -> Result<DocumentId, PersistenceError> {
        validate_collection_path(path)?;
        if !document.is_object() {
            return Err(PersistenceError::rejected("document body must be a JSON object"));
        }

        let id = DocumentId::generate();
        let now = Timestamp::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, collection_path, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(id.as_str())
        .bind(path)
        .bind(&document)
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert document", e))?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(DOCUMENT_CHANGES_CHANNEL)
            .bind(path)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("notify", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;

        tracing::debug!(collection = path, document_id = %id, "Document added");
        Ok(id)
    }

    async fn query_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<Vec<StoredDocument>, PersistenceError> {
        validate_collection_path(path)?;
        Self::fetch_collection(&self.pool, path, order).await
    }

    async fn subscribe_collection(
        &self,
        path: &str,
        order: QueryOrder,
    ) -> Result<BoxStream<'static, Vec<StoredDocument>>, PersistenceError> {
        validate_collection_path(path)?;

        // Listen before the first read so no insert falls between the two.
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("listen", e))?;
        listener
            .listen(DOCUMENT_CHANGES_CHANNEL)
            .await
            .map_err(|e| map_sqlx_error("listen", e))?;

        let initial = Self::fetch_collection(&self.pool, path, order).await?;
        let pool = self.pool.clone();
        let path = path.to_string();

        let snapshots = stream::unfold(
            (Some(initial), listener),
            move |(pending, mut listener)| {
                let pool = pool.clone();
                let path = path.clone();
                async move {
                    if let Some(initial) = pending {
                        return Some((initial, (None, listener)));
                    }
                    loop {
                        match listener.recv().await {
                            Ok(notification) if notification.payload() == path => break,
                            Ok(_) => continue,
                            Err(e) => {
                                tracing::warn!(collection = %path, error = %e, "Listener closed");
                                return None;
                            }
                        }
                    }
                    match Self::fetch_collection(&pool, &path, order).await {
                        Ok(next) => Some((next, (None, listener))),
                        Err(e) => {
                            tracing::warn!(collection = %path, error = %e, "Snapshot query failed");
                            None
                        }
                    }
                }
            },
        );

        Ok(snapshots.boxed())
    }
}

fn row_to_document(row: PgRow) -> Result<StoredDocument, PersistenceError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("read id", e))?;
    let data: Value = row
        .try_get("data")
        .map_err(|e| map_sqlx_error("read data", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| map_sqlx_error("read created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| map_sqlx_error("read updated_at", e))?;

    Ok(StoredDocument {
        id: DocumentId::new(id).map_err(|e| PersistenceError::serialization(e.to_string()))?,
        data,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

/// Maps a sqlx error into the store's error taxonomy.
fn map_sqlx_error(action: &str, err: sqlx::Error) -> PersistenceError {
    match err {
        sqlx::Error::Database(db) => {
            PersistenceError::rejected(format!("{}: {}", action, db.message()))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            PersistenceError::serialization(format!("{}: {}", action, err))
        }
        other => PersistenceError::unavailable(format!("{}: {}", action, other)),
    }
}
