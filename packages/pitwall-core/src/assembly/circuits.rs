//! Circuits view: every driver who raced at the circuit
//!
//! Two hops: circuit → its races (grouped by `circuit_id`) → each race's
//! result drivers. Drivers are listed race by race in result order.

use pitwall_storage::{
    find_documents, Circuit, Collection, CollectionStore, Driver, DriverId, Race,
};
use serde::Serialize;
use tracing::debug;

use super::query::ViewQuery;
use crate::resolution::{
    distinct_links, fetch_grouped, fetch_index, resolve_transitive, Reference, ResolvedLink,
};
use crate::{CoreError, Result};

pub const SEARCH_FIELD: &str = "circuit_id";

/// The driver fields shown per circuit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSummary {
    pub driver_id: DriverId,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    pub nationality: String,
    pub image: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

impl From<Driver> for DriverSummary {
    fn from(driver: Driver) -> Self {
        Self {
            driver_id: driver.driver_id,
            given_name: driver.given_name,
            family_name: driver.family_name,
            nationality: driver.nationality,
            image: driver.image,
            country_code: driver.country_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitView {
    #[serde(flatten)]
    pub circuit: Circuit,
    pub drivers: Vec<Reference<DriverSummary>>,
}

impl CircuitView {
    fn assemble(circuit: Circuit, links: Vec<ResolvedLink<DriverSummary>>, distinct: bool) -> Self {
        let links = if distinct { distinct_links(links) } else { links };
        Self {
            circuit,
            drivers: links.into_iter().map(|link| link.target).collect(),
        }
    }
}

/// Build the circuits view
///
/// Races and drivers are one batched query each, issued in that order since
/// the driver identifiers come from the races.
pub async fn circuits_view<S>(store: &S, query: &ViewQuery) -> Result<Vec<CircuitView>>
where
    S: CollectionStore + ?Sized,
{
    let circuits: Vec<Circuit> =
        find_documents(store, &query.search_filter(SEARCH_FIELD)).await?;
    if circuits.is_empty() {
        return Err(CoreError::EmptyResult(Collection::Circuits));
    }

    let races = fetch_grouped::<Race, _, _, _>(
        store,
        "circuit_id",
        circuits.iter().map(|circuit| circuit.circuit_id.as_str()),
        |race| race.circuit_id.as_str(),
    )
    .await?;

    let driver_ids = races.values().flat_map(|race| {
        race.race_results
            .iter()
            .map(|result| result.driver_id.as_str())
    });
    let drivers = fetch_index::<Driver, _, _>(store, driver_ids)
        .await?
        .map_values(DriverSummary::from);
    debug!(
        circuits = circuits.len(),
        races = races.values().count(),
        drivers = drivers.len(),
        "circuits view indices built"
    );

    Ok(resolve_transitive(
        circuits,
        |circuit| circuit.circuit_id.as_str(),
        &races,
        |race| race.race_results.as_slice(),
        |result| result.driver_id.as_str(),
        &drivers,
        |circuit, links| CircuitView::assemble(circuit, links, query.distinct_drivers),
    ))
}
