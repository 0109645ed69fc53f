//! Stored-report history model and browse helpers.
//!
//! The history collaborator returns one record per generated schedule, each
//! carrying a creation timestamp and a `summary` document in the same
//! variable shape the normalizer handles. Searching, sorting, and filtering
//! are pure functions over that list; re-opening a report builds a
//! [`ScheduleSource`] for the normalizer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{ScheduleSource, UserInfoOverride};

/// A previously generated report, as stored by the history collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Value,
}

/// Sort order for the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Crop,
}

/// Filter applied to the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    /// Created within the last seven days.
    Recent,
    /// At least one irrigation day.
    #[serde(rename = "irrigation")]
    WithIrrigation,
}

const RECENT_WINDOW_DAYS: i64 = 7;

impl StoredReport {
    /// Crop name recorded in the stored summary.
    pub fn crop_name(&self) -> Option<String> {
        self.summary_string(&["user_data", "crop_info", "name"])
    }

    /// Soil label recorded in the stored summary.
    pub fn soil_label(&self) -> Option<String> {
        self.summary_string(&["user_data", "soil_type"])
    }

    /// Farm address recorded in the stored summary.
    pub fn address(&self) -> Option<String> {
        self.summary_string(&["user_data", "location", "address"])
    }

    /// Days with irrigation across the stored week.
    pub fn total_irrigation_days(&self) -> u64 {
        self.summary
            .get("total_irrigation_days")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Total water volume across the stored week.
    pub fn total_water_liters(&self) -> f64 {
        self.summary
            .get("total_water_liters")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Case-insensitive match against crop, soil, or address.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [self.crop_name(), self.soil_label(), self.address()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Build the normalizer input for re-opening this report: the stored
    /// summary as the document, its schedule array made explicit, and the
    /// fields this list already resolved passed as overrides.
    pub fn replay_source(&self) -> ScheduleSource {
        let schedule = self
            .summary
            .get("schedule")
            .and_then(Value::as_array)
            .cloned();

        let mut source = ScheduleSource::from_document(self.summary.clone()).with_user_info(
            UserInfoOverride {
                crop: self.crop_name(),
                soil: self.soil_label(),
                location: self.address(),
            },
        );
        if let Some(schedule) = schedule {
            source = source.with_schedule(schedule);
        }
        source
    }

    fn summary_string(&self, path: &[&str]) -> Option<String> {
        let value = path
            .iter()
            .try_fold(&self.summary, |value, key| value.get(key))?;
        value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

/// Search, filter, and sort a history list.
///
/// `now` anchors the "recent" window so callers (and tests) control the
/// clock. The input is left untouched.
pub fn browse_reports(
    reports: &[StoredReport],
    search: &str,
    filter: HistoryFilter,
    sort: SortOrder,
    now: DateTime<Utc>,
) -> Vec<StoredReport> {
    let mut selected: Vec<StoredReport> = reports
        .iter()
        .filter(|report| report.matches_search(search))
        .filter(|report| match filter {
            HistoryFilter::All => true,
            HistoryFilter::Recent => {
                now.signed_duration_since(report.created_at) < Duration::days(RECENT_WINDOW_DAYS)
            }
            HistoryFilter::WithIrrigation => report.total_irrigation_days() > 0,
        })
        .cloned()
        .collect();

    match sort {
        SortOrder::Newest => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Crop => selected.sort_by(|a, b| {
            a.crop_name()
                .unwrap_or_default()
                .cmp(&b.crop_name().unwrap_or_default())
        }),
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn report(id: &str, days_ago: i64, crop: &str, irrigation_days: u64) -> StoredReport {
        StoredReport {
            id: id.to_string(),
            created_at: Utc::now() - Duration::days(days_ago),
            summary: json!({
                "total_irrigation_days": irrigation_days,
                "total_water_liters": 1200.0,
                "schedule": [{"date": "2025-06-01", "irrigation_needed": irrigation_days > 0}],
                "user_data": {
                    "crop_info": {"name": crop},
                    "soil_type": "Loam",
                    "location": {"address": "Mysuru"}
                }
            }),
        }
    }

    #[test]
    fn test_summary_accessors() {
        let r = report("a", 0, "Rice", 3);
        assert_eq!(r.crop_name().as_deref(), Some("Rice"));
        assert_eq!(r.soil_label().as_deref(), Some("Loam"));
        assert_eq!(r.address().as_deref(), Some("Mysuru"));
        assert_eq!(r.total_irrigation_days(), 3);
        assert_eq!(r.total_water_liters(), 1200.0);
    }

    #[test]
    fn test_search_matches_any_field() {
        let r = report("a", 0, "Rice", 0);
        assert!(r.matches_search("rice"));
        assert!(r.matches_search("LOAM"));
        assert!(r.matches_search("mys"));
        assert!(r.matches_search(""));
        assert!(!r.matches_search("wheat"));
    }

    #[test]
    fn test_browse_sort_orders() {
        let reports = vec![
            report("old", 10, "Wheat", 0),
            report("new", 1, "Banana", 2),
        ];
        let now = Utc::now();

        let newest = browse_reports(&reports, "", HistoryFilter::All, SortOrder::Newest, now);
        assert_eq!(newest[0].id, "new");

        let oldest = browse_reports(&reports, "", HistoryFilter::All, SortOrder::Oldest, now);
        assert_eq!(oldest[0].id, "old");

        let by_crop = browse_reports(&reports, "", HistoryFilter::All, SortOrder::Crop, now);
        assert_eq!(by_crop[0].id, "new"); // Banana < Wheat
    }

    #[test]
    fn test_browse_filters() {
        let reports = vec![
            report("dry", 1, "Wheat", 0),
            report("wet", 10, "Rice", 4),
        ];
        let now = Utc::now();

        let recent = browse_reports(&reports, "", HistoryFilter::Recent, SortOrder::Newest, now);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "dry");

        let irrigated = browse_reports(
            &reports,
            "",
            HistoryFilter::WithIrrigation,
            SortOrder::Newest,
            now,
        );
        assert_eq!(irrigated.len(), 1);
        assert_eq!(irrigated[0].id, "wet");
    }

    #[test]
    fn test_replay_source_normalizes() {
        let r = report("a", 0, "Rice", 3);
        let result = normalize(&r.replay_source());
        assert_eq!(result.crop, "Rice");
        assert_eq!(result.soil, "Loam");
        assert_eq!(result.location, "Mysuru");
        assert_eq!(result.days.len(), 1);
    }

    #[test]
    fn test_replay_source_without_schedule_is_absent() {
        let r = StoredReport {
            id: "x".into(),
            created_at: Utc::now(),
            summary: json!({"user_data": {"soil_type": "Clay"}}),
        };
        let result = normalize(&r.replay_source());
        assert!(result.is_absent());
        assert_eq!(result.soil, "Clay");
    }
}
