//! Positional race-time formatting
//!
//! The winner's time is shown as a full clock, the next two as the seconds
//! component only, everybody else as total seconds. The asymmetry between
//! positions 1-2 (seconds within the minute) and 3+ (total seconds) is
//! intentional and kept as is.

use chrono::{DateTime, Timelike};
use serde::Serialize;
use serde_json::Number;

/// Placeholder for a time that cannot be shown
pub const NOT_AVAILABLE: &str = "N/A";

/// Format `millis` for the result at `position_index` (0-based)
///
/// Position 0 reads the UTC clock components of `millis` since the epoch,
/// so durations of a day or more wrap around. NaN, negative, infinite or
/// unrepresentable inputs give `"N/A"`.
pub fn format_race_time(millis: f64, position_index: usize) -> String {
    if !millis.is_finite() || millis < 0.0 {
        return NOT_AVAILABLE.to_owned();
    }

    let whole = millis.trunc();
    if whole > i64::MAX as f64 {
        return NOT_AVAILABLE.to_owned();
    }
    let Some(clock) = DateTime::from_timestamp_millis(whole as i64) else {
        return NOT_AVAILABLE.to_owned();
    };

    let seconds = clock.second();
    let ms = clock.timestamp_subsec_millis();

    match position_index {
        0 => format!(
            "{}:{:02}:{:02}.{:03}",
            clock.hour(),
            clock.minute(),
            seconds,
            ms
        ),
        1 | 2 => format!("{seconds}.{ms:03}"),
        _ => format!("{:.3}", millis / 1000.0),
    }
}

/// `race_time` as it appears in a payload
///
/// The stored millisecond number unless the caller asked for formatted times.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RaceTime {
    Millis(Number),
    Display(String),
}

impl RaceTime {
    pub fn for_result(millis: &Number, position_index: usize, format: bool) -> Self {
        if format {
            let millis = millis.as_f64().unwrap_or(f64::NAN);
            RaceTime::Display(format_race_time(millis, position_index))
        } else {
            RaceTime::Millis(millis.clone())
        }
    }
}
