//! Response Assembler
//!
//! One view per collection. Every view reads its primary records with the
//! query's search filter, batches each reference field into one fetch,
//! joins, then attaches derived fields. Record order is the store's order.

pub mod circuits;
pub mod drivers;
pub mod query;
pub mod races;
pub mod teams;

use std::str::FromStr;

use pitwall_storage::{Collection, CollectionStore};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub use circuits::{circuits_view, CircuitView, DriverSummary};
pub use drivers::{drivers_view, DriverView};
pub use query::ViewQuery;
pub use races::{races_view, RaceResultView, RaceView};
pub use teams::{teams_view, FlaggedDriver, TeamView};

use crate::{CoreError, Result};

/// Assemble the view of `collection` as a JSON payload
pub async fn assemble<S>(store: &S, collection: Collection, query: &ViewQuery) -> Result<Value>
where
    S: CollectionStore + ?Sized,
{
    let payload = match collection {
        Collection::Races => encode(races_view(store, query).await?)?,
        Collection::Teams => encode(teams_view(store, query).await?)?,
        Collection::Drivers => encode(drivers_view(store, query).await?)?,
        Collection::Circuits => encode(circuits_view(store, query).await?)?,
    };

    info!(
        collection = collection.as_str(),
        records = payload.as_array().map_or(0, Vec::len),
        search = query.search.as_deref().unwrap_or(""),
        "view assembled"
    );
    Ok(payload)
}

/// [`assemble`] addressed by collection name
pub async fn assemble_named<S>(store: &S, name: &str, query: &ViewQuery) -> Result<Value>
where
    S: CollectionStore + ?Sized,
{
    let collection =
        Collection::from_str(name).map_err(|_| CoreError::UnknownCollection(name.to_owned()))?;
    assemble(store, collection, query).await
}

fn encode<T: Serialize>(views: Vec<T>) -> Result<Value> {
    Ok(serde_json::to_value(views)?)
}
