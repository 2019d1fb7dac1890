//! In-Memory Collection Store
//!
//! Ordered `Vec` per collection behind a lock. Used by unit tests and by the
//! CLI when no database path is configured.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Collection, CollectionStore, Filter};
use crate::Result;

#[derive(Clone, Default)]
pub struct InMemoryCollectionStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Value>>>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let matcher = filter.matcher();
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matcher.is_match(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, document: Value) -> Result<()> {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(document);
        Ok(())
    }

    async fn insert_many(&self, collection: Collection, documents: Vec<Value>) -> Result<()> {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .extend(documents);
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map_or(0, Vec::len))
    }
}
