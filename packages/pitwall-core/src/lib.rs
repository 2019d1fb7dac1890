//! pitwall-core - denormalized read views over the collection store
//!
//! Relationships between circuits, drivers, teams and races are stored as
//! string identifiers. This crate joins them back together per request:
//!
//! ```text
//! CollectionStore → resolution (batched index + joins) → presentation
//!                 → assembly (one view per collection) → ApiResponse
//! ```
//!
//! Every reference field of a view costs exactly one batched query no matter
//! how many records repeat an identifier. A reference that does not resolve
//! is `null` in the payload; only a failing fetch fails the view.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitwall_core::{handle, ViewQuery};
//!
//! let response = handle(&store, "races", &ViewQuery::new().with_format_times(true)).await;
//! assert_eq!(response.status, 200);
//! ```

pub mod assembly;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod presentation;
pub mod resolution;
pub mod response;

pub use error::{CoreError, Result};

pub use assembly::{
    assemble, assemble_named, circuits_view, drivers_view, races_view, teams_view, CircuitView,
    DriverSummary, DriverView, FlaggedDriver, RaceResultView, RaceView, TeamView, ViewQuery,
};
pub use config::{ConfigError, Environment, PitwallConfig, StoreBackend};
pub use fixtures::Fixtures;
pub use presentation::{flag_url, format_race_time, RaceTime};
pub use resolution::{Reference, ReferenceIndex};
pub use response::{handle, ApiResponse};
