//! Per-request view options

use pitwall_storage::Filter;
use serde::{Deserialize, Serialize};

/// Options shared by every view
///
/// `format_times` only affects the races view and `distinct_drivers` only
/// the circuits view; other views ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    /// Case-insensitive regex on the view's search field
    pub search: Option<String>,

    #[serde(alias = "format", alias = "formatTimes")]
    pub format_times: bool,

    #[serde(alias = "distinct", alias = "distinctDrivers")]
    pub distinct_drivers: bool,
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_format_times(mut self, format_times: bool) -> Self {
        self.format_times = format_times;
        self
    }

    pub fn with_distinct_drivers(mut self, distinct_drivers: bool) -> Self {
        self.distinct_drivers = distinct_drivers;
        self
    }

    /// Primary filter for a view searching on `field`
    ///
    /// No search, or an empty one, selects everything.
    pub fn search_filter(&self, field: &str) -> Filter {
        match self.search.as_deref() {
            Some(pattern) if !pattern.is_empty() => Filter::matches(field, pattern),
            _ => Filter::All,
        }
    }
}
