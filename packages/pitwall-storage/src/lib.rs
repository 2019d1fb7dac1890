//! pitwall-storage - Collection Store for motorsport statistics
//!
//! Documents live in four fixed collections (circuits, drivers, teams,
//! races). Relationships between them are stored as string identifiers,
//! never as embedded documents or native references.
//!
//! ## Layers
//!
//! - `domain`: typed entities, the collection catalogue, the `Filter`
//!   predicate language and the `CollectionStore` port
//! - `infrastructure`: in-memory and SQLite adapters
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitwall_storage::{find_documents, Driver, Filter, InMemoryCollectionStore};
//!
//! let store = InMemoryCollectionStore::new();
//! let drivers: Vec<Driver> =
//!     find_documents(&store, &Filter::any_of("driver_id", ["norris", "piastri"])).await?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    find_documents, insert_documents, Attributes, Circuit, CircuitId, Collection,
    CollectionStore, Document, Driver, DriverId, Filter, FilterMatcher, Keyed, Location, Race,
    RaceResult, Team, TeamId, TeamSeat,
};

pub use infrastructure::InMemoryCollectionStore;
#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteCollectionStore;
