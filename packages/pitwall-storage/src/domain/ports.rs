//! Storage Port (Trait Interface)
//!
//! Port/Adapter pattern for backend flexibility:
//! - Development: SQLite (zero-config)
//! - Testing: InMemory (fast unit tests)

use async_trait::async_trait;
use serde_json::Value;

use super::collection::{Collection, Document};
use super::filter::Filter;
use crate::error::StorageError;
use crate::Result;

/// Collection Store Port (Primary Interface)
///
/// All storage backends must implement this trait. Documents are returned in
/// the collection's natural (insertion) order.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Every document of `collection` satisfying `filter`
    ///
    /// One call is one query against the backend. A backend that cannot be
    /// reached returns an error of kind `Unavailable` or `Database`.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>>;

    /// Append a document (fixture loading; no validation)
    async fn insert(&self, collection: Collection, document: Value) -> Result<()>;

    /// Append several documents as one batch
    async fn insert_many(&self, collection: Collection, documents: Vec<Value>) -> Result<()>;

    /// Number of documents in `collection`
    async fn count(&self, collection: Collection) -> Result<usize>;
}

/// Typed `find`: runs the query and decodes every document as `D`
///
/// A document that does not decode fails the whole call; a half-decoded
/// collection is never returned.
pub async fn find_documents<D, S>(store: &S, filter: &Filter) -> Result<Vec<D>>
where
    D: Document,
    S: CollectionStore + ?Sized,
{
    let raw = store.find(D::COLLECTION, filter).await?;
    raw.into_iter()
        .map(|doc| {
            serde_json::from_value(doc).map_err(|e| {
                StorageError::serialization(format!(
                    "Malformed document in '{}': {}",
                    D::COLLECTION,
                    e
                ))
                .with_source(e)
            })
        })
        .collect()
}

/// Encode and insert typed documents
pub async fn insert_documents<D, S>(store: &S, documents: &[D]) -> Result<()>
where
    D: Document,
    S: CollectionStore + ?Sized,
{
    let encoded = documents
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    store.insert_many(D::COLLECTION, encoded).await
}
