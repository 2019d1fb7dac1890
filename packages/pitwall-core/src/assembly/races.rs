//! Races view: results joined to drivers, circuit and fastest lap attached

use pitwall_storage::{
    find_documents, Attributes, Circuit, CircuitId, Collection, CollectionStore, Driver,
    DriverId, Race, RaceResult,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::query::ViewQuery;
use crate::presentation::RaceTime;
use crate::resolution::{fetch_index, resolve_one_to_many, resolve_one_to_one, Reference};
use crate::{CoreError, Result};

/// Field the races view searches on
pub const SEARCH_FIELD: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceView {
    pub name: String,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub round: u32,
    pub circuit_id: CircuitId,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub date: Value,
    pub sprint_race: bool,
    pub fastest_lap: Option<DriverId>,
    pub race_results: Vec<RaceResultView>,
    pub circuit: Reference<Circuit>,
    pub fastest_lap_driver: Reference<Driver>,
    #[serde(flatten)]
    pub attrs: Attributes,
}

/// One result row; the stored fields plus `driver` and `race_time`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResultView {
    #[serde(flatten)]
    pub result: RaceResult,
    pub driver: Reference<Driver>,
    pub race_time: RaceTime,
}

impl RaceView {
    fn assemble(
        race: Race,
        circuit: Reference<Circuit>,
        fastest_lap_driver: Reference<Driver>,
        drivers: Vec<Reference<Driver>>,
        format_times: bool,
    ) -> Self {
        let race_results = race
            .race_results
            .into_iter()
            .zip(drivers)
            .enumerate()
            .map(|(index, (result, driver))| RaceResultView {
                race_time: RaceTime::for_result(&result.time, index, format_times),
                result,
                driver,
            })
            .collect();

        Self {
            name: race.name,
            country: race.country,
            country_code: race.country_code,
            round: race.round,
            circuit_id: race.circuit_id,
            date: race.date,
            sprint_race: race.sprint_race,
            fastest_lap: race.fastest_lap,
            race_results,
            circuit,
            fastest_lap_driver,
            attrs: race.attrs,
        }
    }
}

/// Build the races view
///
/// Drivers (results and fastest lap) and circuits are fetched concurrently,
/// one batched query each.
pub async fn races_view<S>(store: &S, query: &ViewQuery) -> Result<Vec<RaceView>>
where
    S: CollectionStore + ?Sized,
{
    let races: Vec<Race> = find_documents(store, &query.search_filter(SEARCH_FIELD)).await?;
    if races.is_empty() {
        return Err(CoreError::EmptyResult(Collection::Races));
    }

    let driver_ids = races.iter().flat_map(|race| {
        race.race_results
            .iter()
            .map(|result| result.driver_id.as_str())
            .chain(race.fastest_lap.as_deref())
    });
    let circuit_ids = races.iter().map(|race| race.circuit_id.as_str());

    let (drivers, circuits) = tokio::try_join!(
        fetch_index::<Driver, _, _>(store, driver_ids),
        fetch_index::<Circuit, _, _>(store, circuit_ids),
    )?;
    debug!(
        races = races.len(),
        drivers = drivers.len(),
        circuits = circuits.len(),
        "races view indices built"
    );

    let with_circuit = resolve_one_to_one(
        races,
        |race| Some(race.circuit_id.as_str()),
        &circuits,
        |race, circuit| (race, circuit),
    );
    let with_fastest_lap = resolve_one_to_one(
        with_circuit,
        |(race, _)| race.fastest_lap.as_deref(),
        &drivers,
        |(race, circuit), fastest| (race, circuit, fastest),
    );

    Ok(resolve_one_to_many(
        with_fastest_lap,
        |(race, _, _)| race.race_results.as_slice(),
        |result| result.driver_id.as_str(),
        &drivers,
        |(race, circuit, fastest), result_drivers| {
            RaceView::assemble(race, circuit, fastest, result_drivers, query.format_times)
        },
    ))
}
