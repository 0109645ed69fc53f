//! Per-day schedule entry model.
//!
//! Every field defaults so that a partially populated document still yields
//! a usable entry; the views treat zero/empty as "not reported".

use serde::{Deserialize, Serialize};

/// One day of the irrigation schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// ISO date (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    /// Weekday name ("Monday", ...)
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub weather: Weather,
    /// Reference evapotranspiration (mm)
    #[serde(default)]
    pub et0: f64,
    /// Crop evapotranspiration (mm)
    #[serde(default)]
    pub etc: f64,
    #[serde(default)]
    pub soil_moisture_mm: f64,
    #[serde(default)]
    pub soil_moisture_percent: f64,
    #[serde(default)]
    pub irrigation_needed: bool,
    #[serde(default)]
    pub irrigation_amount_mm: f64,
    #[serde(default)]
    pub irrigation_duration_hours: f64,
    /// Recommended window, e.g. "06:00-08:00"
    #[serde(default)]
    pub best_irrigation_time: String,
    #[serde(default)]
    pub total_water_liters: f64,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub ml_confidence: f64,
    #[serde(default)]
    pub prediction_method: String,
}

/// Daily weather snapshot attached to a schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub rainfall: f64,
    #[serde(default)]
    pub wind_speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_entry_deserializes() {
        let entry: DayEntry =
            serde_json::from_str(r#"{"date":"2025-06-01","irrigation_needed":true}"#).unwrap();
        assert!(entry.irrigation_needed);
        assert_eq!(entry.date, "2025-06-01");
        assert_eq!(entry.weather, Weather::default());
        assert_eq!(entry.irrigation_amount_mm, 0.0);
    }

    #[test]
    fn test_round_trip() {
        let entry = DayEntry {
            date: "2025-06-02".into(),
            day_name: "Monday".into(),
            irrigation_needed: true,
            irrigation_amount_mm: 12.5,
            weather: Weather {
                temp_max: 34.0,
                temp_min: 22.0,
                humidity: 40.0,
                rainfall: 0.0,
                wind_speed: 3.2,
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: DayEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
