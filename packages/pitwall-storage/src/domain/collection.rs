//! Collection catalogue
//!
//! The set of collections is fixed and declared up front. Adapters create
//! their schema from this catalogue at startup; there is no lazy
//! "register if absent" path.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

/// Stored collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Circuits,
    Drivers,
    Teams,
    Races,
}

impl Collection {
    /// Every collection, in schema declaration order
    pub const ALL: [Collection; 4] = [
        Collection::Circuits,
        Collection::Drivers,
        Collection::Teams,
        Collection::Races,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Circuits => "circuits",
            Collection::Drivers => "drivers",
            Collection::Teams => "teams",
            Collection::Races => "races",
        }
    }

    /// Fields that are looked up by equality or set membership
    ///
    /// Adapters that support secondary indexes build one per entry.
    pub fn indexed_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Circuits => &["circuit_id"],
            Collection::Drivers => &["driver_id", "team_id"],
            Collection::Teams => &["team_id"],
            Collection::Races => &["circuit_id"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circuits" => Ok(Collection::Circuits),
            "drivers" => Ok(Collection::Drivers),
            "teams" => Ok(Collection::Teams),
            "races" => Ok(Collection::Races),
            _ => Err(StorageError::unknown_collection(s)),
        }
    }
}

/// A typed record living in exactly one collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;
}

/// A document with a unique string key other records may reference
pub trait Keyed: Document {
    /// Stored field holding the key
    const KEY_FIELD: &'static str;

    fn key(&self) -> &str;
}
