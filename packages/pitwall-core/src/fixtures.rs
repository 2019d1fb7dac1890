//! Fixture files for seeding a store
//!
//! ```json
//! {"circuits": [...], "drivers": [...], "teams": [...], "races": [...]}
//! ```
//!
//! Documents are inserted as raw JSON; nothing is validated here, so a
//! malformed document only surfaces when a view decodes it.

use std::path::Path;

use pitwall_storage::{Collection, CollectionStore, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub circuits: Vec<Value>,
    pub drivers: Vec<Value>,
    pub teams: Vec<Value>,
    pub races: Vec<Value>,
}

impl Fixtures {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    fn documents(&self, collection: Collection) -> &[Value] {
        match collection {
            Collection::Circuits => &self.circuits,
            Collection::Drivers => &self.drivers,
            Collection::Teams => &self.teams,
            Collection::Races => &self.races,
        }
    }

    /// Insert every collection as one batch each; returns documents written
    pub async fn load_into<S>(&self, store: &S) -> Result<usize>
    where
        S: CollectionStore + ?Sized,
    {
        let mut total = 0;
        for collection in Collection::ALL {
            let documents = self.documents(collection);
            if documents.is_empty() {
                continue;
            }
            store.insert_many(collection, documents.to_vec()).await?;
            info!(collection = collection.as_str(), documents = documents.len(), "seeded");
            total += documents.len();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_storage::{ErrorKind, InMemoryCollectionStore};

    #[tokio::test]
    async fn test_load_into_store() {
        let fixtures = Fixtures::from_json_str(
            r#"{"drivers": [{"driver_id": "a"}, {"driver_id": "b"}], "races": [{"name": "x"}]}"#,
        )
        .unwrap();
        let store = InMemoryCollectionStore::new();

        assert_eq!(fixtures.load_into(&store).await.unwrap(), 3);
        assert_eq!(store.count(Collection::Drivers).await.unwrap(), 2);
        assert_eq!(store.count(Collection::Races).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Teams).await.unwrap(), 0);
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = Fixtures::from_json_str("{\"drivers\": 3}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }
}
