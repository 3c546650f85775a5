//! Document store adapters.
//!
//! Implementations of the `DocumentStore` port:
//!
//! - `InMemoryDocumentStore` - process-local collections with broadcast fan-out
//! - `PostgresDocumentStore` - `documents` table with LISTEN/NOTIFY subscriptions

mod in_memory;
mod postgres;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::{PostgresDocumentStore, DOCUMENT_CHANGES_CHANNEL};
