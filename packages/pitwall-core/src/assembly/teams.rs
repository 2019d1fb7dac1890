//! Teams view: seat list replaced by the resolved, flagged drivers

use pitwall_storage::{
    find_documents, Attributes, Collection, CollectionStore, Driver, Team, TeamId,
};
use serde::Serialize;
use tracing::debug;

use super::query::ViewQuery;
use crate::presentation::flag_url;
use crate::resolution::{fetch_index, resolve_one_to_many, Reference};
use crate::{CoreError, Result};

pub const SEARCH_FIELD: &str = "name";

/// A driver with its `country_flag` attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedDriver {
    #[serde(flatten)]
    pub driver: Driver,
    pub country_flag: String,
}

impl From<Driver> for FlaggedDriver {
    fn from(driver: Driver) -> Self {
        Self {
            country_flag: flag_url(&driver.country_code),
            driver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    pub team_id: TeamId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub principal: String,
    pub base: String,
    pub founded_year: i32,
    pub engine: String,
    /// One entry per seat, in seat order; `null` for an unknown driver
    pub drivers: Vec<Reference<FlaggedDriver>>,
    pub image: String,
    #[serde(flatten)]
    pub attrs: Attributes,
}

impl TeamView {
    fn assemble(team: Team, drivers: Vec<Reference<FlaggedDriver>>) -> Self {
        Self {
            team_id: team.team_id,
            name: team.name,
            country: team.country,
            country_code: team.country_code,
            principal: team.principal,
            base: team.base,
            founded_year: team.founded_year,
            engine: team.engine,
            drivers,
            image: team.image,
            attrs: team.attrs,
        }
    }
}

pub async fn teams_view<S>(store: &S, query: &ViewQuery) -> Result<Vec<TeamView>>
where
    S: CollectionStore + ?Sized,
{
    let teams: Vec<Team> = find_documents(store, &query.search_filter(SEARCH_FIELD)).await?;
    if teams.is_empty() {
        return Err(CoreError::EmptyResult(Collection::Teams));
    }

    let seat_ids = teams
        .iter()
        .flat_map(|team| team.drivers.iter().map(|seat| seat.driver_id.as_str()));
    let drivers = fetch_index::<Driver, _, _>(store, seat_ids)
        .await?
        .map_values(FlaggedDriver::from);
    debug!(teams = teams.len(), drivers = drivers.len(), "teams view index built");

    Ok(resolve_one_to_many(
        teams,
        |team| team.drivers.as_slice(),
        |seat| seat.driver_id.as_str(),
        &drivers,
        TeamView::assemble,
    ))
}
