//! Presentation Formatter
//!
//! Derived display fields. Nothing here touches a stored entity; callers
//! attach the results next to the canonical fields.

pub mod flag;
pub mod race_time;

pub use flag::flag_url;
pub use race_time::{format_race_time, RaceTime, NOT_AVAILABLE};
