//! Storage Domain Models
//!
//! Canonical entity shapes as they are stored. Relationships are plain string
//! identifiers (`team_id`, `circuit_id`, `driver_id`); resolving them is the
//! read engine's job, not the store's.
//!
//! Every entity keeps an `attrs` bag for stored fields that are not part of
//! the typed shape (store-assigned `_id`, timestamps, legacy columns). The bag
//! is flattened back on serialization so those fields round-trip verbatim.
//! Dates are never computed on, so they stay the stored JSON value too.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::collection::{Collection, Document, Keyed};

/// Untyped stored fields carried alongside an entity
pub type Attributes = BTreeMap<String, Value>;

/// Circuit identifier (e.g. `"monza"`)
pub type CircuitId = String;

/// Driver identifier (e.g. `"max_verstappen"`)
pub type DriverId = String;

/// Team identifier (e.g. `"red_bull"`)
pub type TeamId = String;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Circuit
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Circuit Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit ID (unique)
    pub circuit_id: CircuitId,

    /// Display name
    pub name: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    pub location: Location,

    /// Lap length in kilometres
    pub length_km: f64,

    /// Number of corners
    pub turns: u32,

    #[serde(flatten)]
    pub attrs: Attributes,
}

/// Circuit location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub city: String,
}

impl Document for Circuit {
    const COLLECTION: Collection = Collection::Circuits;
}

impl Keyed for Circuit {
    const KEY_FIELD: &'static str = "circuit_id";

    fn key(&self) -> &str {
        &self.circuit_id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Driver
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Driver Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Driver ID (unique)
    pub driver_id: DriverId,

    #[serde(rename = "givenName")]
    pub given_name: String,

    #[serde(rename = "familyName")]
    pub family_name: String,

    pub nationality: String,

    /// ISO 3166-1 alpha-2 code (e.g. `"NL"`)
    #[serde(rename = "countryCode")]
    pub country_code: String,

    /// As stored (`"1997-09-30"`, `"1997-09-30T00:00:00.000Z"`, ...)
    #[serde(rename = "dateOfBirth", default, skip_serializing_if = "Value::is_null")]
    pub date_of_birth: Value,

    /// Portrait URL
    #[serde(default)]
    pub image: String,

    /// Biography URL
    #[serde(default)]
    pub url: String,

    /// Team reference (foreign key into `teams`)
    #[serde(default)]
    pub team_id: Option<TeamId>,

    #[serde(flatten)]
    pub attrs: Attributes,
}

impl Document for Driver {
    const COLLECTION: Collection = Collection::Drivers;
}

impl Keyed for Driver {
    const KEY_FIELD: &'static str = "driver_id";

    fn key(&self) -> &str {
        &self.driver_id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Team
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Team Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team ID (unique)
    pub team_id: TeamId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(
        rename = "countryCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub country_code: Option<String>,

    /// Team principal
    pub principal: String,

    /// Factory base
    pub base: String,

    pub founded_year: i32,

    /// Power unit supplier
    pub engine: String,

    /// Race seats in grid order
    #[serde(default)]
    pub drivers: Vec<TeamSeat>,

    #[serde(default)]
    pub image: String,

    #[serde(flatten)]
    pub attrs: Attributes,
}

/// One race seat of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeat {
    pub driver_id: DriverId,
    pub position: u32,

    #[serde(flatten)]
    pub attrs: Attributes,
}

impl TeamSeat {
    pub fn new(driver_id: impl Into<String>, position: u32) -> Self {
        Self {
            driver_id: driver_id.into(),
            position,
            attrs: Attributes::new(),
        }
    }
}

impl Document for Team {
    const COLLECTION: Collection = Collection::Teams;
}

impl Keyed for Team {
    const KEY_FIELD: &'static str = "team_id";

    fn key(&self) -> &str {
        &self.team_id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Race
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Race Entity
///
/// Races have no natural key of their own; they are reached either as the
/// primary collection or through `circuit_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    pub country: String,

    #[serde(rename = "countryCode")]
    pub country_code: String,

    /// Championship round number
    pub round: u32,

    /// Circuit reference (foreign key into `circuits`)
    pub circuit_id: CircuitId,

    /// As stored
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub date: Value,

    pub sprint_race: bool,

    /// Driver reference of the fastest lap holder
    #[serde(default)]
    pub fastest_lap: Option<DriverId>,

    /// Classification, ordered by finishing position
    #[serde(default)]
    pub race_results: Vec<RaceResult>,

    #[serde(flatten)]
    pub attrs: Attributes,
}

/// One classified finisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub position: u32,

    /// Driver reference (foreign key into `drivers`)
    pub driver_id: DriverId,

    /// Race time in milliseconds, kept as stored (may be fractional)
    pub time: serde_json::Number,

    /// Championship points, kept as stored (half points exist)
    pub points: serde_json::Number,

    #[serde(flatten)]
    pub attrs: Attributes,
}

impl RaceResult {
    pub fn new(position: u32, driver_id: impl Into<String>, time: i64, points: u32) -> Self {
        Self {
            position,
            driver_id: driver_id.into(),
            time: time.into(),
            points: points.into(),
            attrs: Attributes::new(),
        }
    }
}

impl Document for Race {
    const COLLECTION: Collection = Collection::Races;
}
