//! Storage Infrastructure Layer
//!
//! Storage backends for the CollectionStore trait

pub mod memory_store;
pub use memory_store::InMemoryCollectionStore;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteCollectionStore;
