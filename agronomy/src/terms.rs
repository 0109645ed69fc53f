//! Shared vocabulary enums.
//!
//! Wire labels match the recommendation service's JSON values exactly
//! (lowercase, with `semi-arid` keeping its hyphen).

use serde::{Deserialize, Serialize};

/// Farming experience bands collected at step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// 0-2 years
    Beginner,
    /// 3-10 years
    Intermediate,
    /// 10+ years
    Experienced,
}

/// Broad climate classification collected at step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Arid,
    #[serde(rename = "semi-arid")]
    SemiArid,
    Tropical,
    Subtropical,
    Temperate,
}

/// Irrigation delivery method collected at step 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationMethod {
    Drip,
    Sprinkler,
    Flood,
    Furrow,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Experienced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Experienced => "experienced",
        }
    }
}

impl ClimateZone {
    pub const ALL: [ClimateZone; 5] = [
        ClimateZone::Arid,
        ClimateZone::SemiArid,
        ClimateZone::Tropical,
        ClimateZone::Subtropical,
        ClimateZone::Temperate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateZone::Arid => "arid",
            ClimateZone::SemiArid => "semi-arid",
            ClimateZone::Tropical => "tropical",
            ClimateZone::Subtropical => "subtropical",
            ClimateZone::Temperate => "temperate",
        }
    }
}

impl IrrigationMethod {
    pub const ALL: [IrrigationMethod; 4] = [
        IrrigationMethod::Drip,
        IrrigationMethod::Sprinkler,
        IrrigationMethod::Flood,
        IrrigationMethod::Furrow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "drip",
            IrrigationMethod::Sprinkler => "sprinkler",
            IrrigationMethod::Flood => "flood",
            IrrigationMethod::Furrow => "furrow",
        }
    }
}
