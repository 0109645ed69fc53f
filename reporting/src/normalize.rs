//! Result normalization.
//!
//! Raw result documents do not share a schema: the submission response nests
//! user data under `summary.user_data`, stored summaries carry the same keys
//! at their own top level, and the list view hands over a flattened variant.
//! Rather than scattering optional lookups across every view, each canonical
//! field resolves through an ordered table of candidate paths; the first
//! non-empty hit wins and [`NOT_SPECIFIED`] is the terminal fallback.

use serde_json::Value;
use tracing::{debug, warn};

use crate::day::DayEntry;

/// Literal fallback when no candidate path yields a value.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Candidate paths for the crop name, in precedence order.
const CROP_PATHS: &[&[&str]] = &[
    &["summary", "user_data", "crop_info", "name"],
    &["user_data", "crop_info", "name"],
    &["summary", "user_data", "crop", "name"],
    &["user_data", "crop", "name"],
    &["summary", "crop_info", "name"],
    &["crop_info", "name"],
];

/// Candidate paths for the soil label.
const SOIL_PATHS: &[&[&str]] = &[
    &["summary", "user_data", "soil_type"],
    &["user_data", "soil_type"],
    &["summary", "soil_type"],
    &["soil_type"],
];

/// Candidate paths for the farm location.
const LOCATION_PATHS: &[&[&str]] = &[
    &["summary", "user_data", "location", "address"],
    &["user_data", "location", "address"],
    &["summary", "location", "address"],
    &["location", "address"],
];

/// Candidate paths for the day list inside the document itself.
const SCHEDULE_PATHS: &[&[&str]] = &[&["schedule"], &["summary", "schedule"]];

/// Caller-supplied field overrides, tried before any document path.
///
/// The history view resolves crop/soil/location once when building its
/// navigation payload; those values take precedence over whatever nesting
/// the stored document uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInfoOverride {
    pub crop: Option<String>,
    pub soil: Option<String>,
    pub location: Option<String>,
}

impl UserInfoOverride {
    pub fn is_empty(&self) -> bool {
        self.crop.is_none() && self.soil.is_none() && self.location.is_none()
    }
}

/// A raw result document plus the side-channel values a call site may carry.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSource {
    /// The raw result document, whatever its nesting.
    pub document: Value,
    /// Explicit day list passed alongside the document (history re-open).
    pub schedule: Option<Vec<Value>>,
    /// Field overrides resolved by the caller.
    pub user_info: UserInfoOverride,
}

impl ScheduleSource {
    /// Source for a fresh submission response.
    pub fn from_document(document: Value) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    /// Attach an explicit day list.
    pub fn with_schedule(mut self, schedule: Vec<Value>) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Attach caller-resolved field overrides.
    pub fn with_user_info(mut self, user_info: UserInfoOverride) -> Self {
        self.user_info = user_info;
        self
    }
}

/// The canonical, display-ready result record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedResult {
    pub crop: String,
    pub soil: String,
    pub location: String,
    pub days: Vec<DayEntry>,
}

impl NormalizedResult {
    /// True when no day list could be extracted; rendered as an empty
    /// state, never as an error banner.
    pub fn is_absent(&self) -> bool {
        self.days.is_empty()
    }
}

/// Resolve a raw result into the canonical shape.
pub fn normalize(source: &ScheduleSource) -> NormalizedResult {
    let crop = resolve_field(source.user_info.crop.as_deref(), &source.document, CROP_PATHS);
    let soil = resolve_field(source.user_info.soil.as_deref(), &source.document, SOIL_PATHS);
    let location = resolve_field(
        source.user_info.location.as_deref(),
        &source.document,
        LOCATION_PATHS,
    );

    let days = extract_days(source);
    if days.is_empty() {
        warn!("no schedule entries found in result document");
    }

    NormalizedResult {
        crop,
        soil,
        location,
        days,
    }
}

fn resolve_field(overridden: Option<&str>, document: &Value, paths: &[&[&str]]) -> String {
    if let Some(value) = overridden.map(str::trim).filter(|s| !s.is_empty()) {
        return value.to_string();
    }
    paths
        .iter()
        .find_map(|path| value_at(document, path).and_then(non_empty_string))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn extract_days(source: &ScheduleSource) -> Vec<DayEntry> {
    if let Some(schedule) = source.schedule.as_deref() {
        if !schedule.is_empty() {
            return parse_days(schedule);
        }
    }
    for path in SCHEDULE_PATHS {
        if let Some(entries) = value_at(&source.document, path).and_then(Value::as_array) {
            if !entries.is_empty() {
                return parse_days(entries);
            }
        }
    }
    Vec::new()
}

fn parse_days(entries: &[Value]) -> Vec<DayEntry> {
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(day) => Some(day),
            Err(err) => {
                debug!(error = %err, "skipping malformed schedule entry");
                None
            }
        })
        .collect()
}

/// Walk a key path into a JSON document.
fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |value, key| value.get(key))
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
