//! Drivers view: flag URL and resolved team

use pitwall_storage::{find_documents, Collection, CollectionStore, Driver, Team};
use serde::Serialize;
use tracing::debug;

use super::query::ViewQuery;
use crate::presentation::flag_url;
use crate::resolution::{fetch_index, resolve_one_to_one, Reference};
use crate::{CoreError, Result};

pub const SEARCH_FIELD: &str = "givenName";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverView {
    #[serde(flatten)]
    pub driver: Driver,
    pub country_flag: String,
    /// `null` when the driver has no team or the team is unknown
    pub team: Reference<Team>,
}

pub async fn drivers_view<S>(store: &S, query: &ViewQuery) -> Result<Vec<DriverView>>
where
    S: CollectionStore + ?Sized,
{
    let drivers: Vec<Driver> = find_documents(store, &query.search_filter(SEARCH_FIELD)).await?;
    if drivers.is_empty() {
        return Err(CoreError::EmptyResult(Collection::Drivers));
    }

    let team_ids = drivers.iter().filter_map(|driver| driver.team_id.as_deref());
    let teams = fetch_index::<Team, _, _>(store, team_ids).await?;
    debug!(drivers = drivers.len(), teams = teams.len(), "drivers view index built");

    Ok(resolve_one_to_one(
        drivers,
        |driver| driver.team_id.as_deref(),
        &teams,
        |driver, team| DriverView {
            country_flag: flag_url(&driver.country_code),
            driver,
            team,
        },
    ))
}
