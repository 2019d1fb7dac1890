//! Storage Domain
//!
//! - `models`: typed entity shapes (Circuit, Driver, Team, Race)
//! - `collection`: fixed collection catalogue and the `Document`/`Keyed` traits
//! - `filter`: predicate language understood by every adapter
//! - `ports`: the `CollectionStore` trait

pub mod collection;
pub mod filter;
pub mod models;
pub mod ports;

pub use collection::{Collection, Document, Keyed};
pub use filter::{Filter, FilterMatcher};
pub use models::{
    Attributes, Circuit, CircuitId, Driver, DriverId, Location, Race, RaceResult, Team, TeamId,
    TeamSeat,
};
pub use ports::{find_documents, insert_documents, CollectionStore};
