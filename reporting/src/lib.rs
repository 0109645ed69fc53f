//! Result normalization and history browsing for AgriFlow.
//!
//! The recommendation service and its storage layer hand back irrigation
//! results in several shapes depending on the call site: a fresh submission
//! carries the full response document, a history re-open carries a stored
//! summary plus an explicit schedule array, and the list view works from a
//! flattened summary. This crate reconciles all of them:
//!
//! - [`normalize`]: ordered candidate-path extraction into a canonical
//!   [`NormalizedResult`]
//! - [`DayEntry`]: the tolerant per-day model
//! - [`filter_days`]: display filtering over a normalized day list
//! - [`StoredReport`]: history records with pure browse helpers
//!
//! Nothing here performs I/O; fetching and deleting reports is the intake
//! client's job.

pub mod day;
pub mod filter;
pub mod history;
pub mod normalize;

// Re-export main types
pub use day::{DayEntry, Weather};
pub use filter::{filter_days, FilterMode};
pub use history::{browse_reports, HistoryFilter, SortOrder, StoredReport};
pub use normalize::{
    normalize, NormalizedResult, ScheduleSource, UserInfoOverride, NOT_SPECIFIED,
};
