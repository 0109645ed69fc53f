//! Display filtering over a normalized day list.

use serde::{Deserialize, Serialize};

use crate::day::DayEntry;

/// Which subset of days a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    Irrigation,
    NoIrrigation,
}

/// Select the days matching `mode`.
///
/// Order is preserved from the source sequence; the input is never mutated
/// or re-sorted.
pub fn filter_days(days: &[DayEntry], mode: FilterMode) -> Vec<DayEntry> {
    days.iter()
        .filter(|day| match mode {
            FilterMode::All => true,
            FilterMode::Irrigation => day.irrigation_needed,
            FilterMode::NoIrrigation => !day.irrigation_needed,
        })
        .cloned()
        .collect()
}
