//! Soil classification catalog.
//!
//! Four soil classes with the hydraulic constants the irrigation model is
//! calibrated against. The manual-selection fallback in the intake wizard
//! lists exactly these kinds.

use serde::{Deserialize, Serialize};

/// A recognized soil classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilKind {
    Sandy,
    Clay,
    Loam,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
}

/// Static hydraulic properties of a soil class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilProperties {
    /// Volumetric water content at field capacity (fraction)
    pub field_capacity: f64,
    /// Volumetric water content at wilting point (fraction)
    pub wilting_point: f64,
    /// Qualitative infiltration rate with typical range
    pub infiltration_rate: &'static str,
    /// Qualitative water holding capacity
    pub water_holding_capacity: &'static str,
    /// One-line irrigation guidance
    pub description: &'static str,
    /// Bulk density (g/cm3)
    pub bulk_density: f64,
    /// Total porosity (fraction)
    pub porosity: f64,
}

const SANDY: SoilProperties = SoilProperties {
    field_capacity: 0.15,
    wilting_point: 0.05,
    infiltration_rate: "High (25-250 mm/hr)",
    water_holding_capacity: "Low",
    description: "Drains quickly, requires frequent irrigation",
    bulk_density: 1.6,
    porosity: 0.4,
};

const CLAY: SoilProperties = SoilProperties {
    field_capacity: 0.35,
    wilting_point: 0.18,
    infiltration_rate: "Low (1-5 mm/hr)",
    water_holding_capacity: "High",
    description: "Retains water well, less frequent irrigation needed",
    bulk_density: 1.3,
    porosity: 0.5,
};

const LOAM: SoilProperties = SoilProperties {
    field_capacity: 0.25,
    wilting_point: 0.12,
    infiltration_rate: "Medium (5-25 mm/hr)",
    water_holding_capacity: "Medium",
    description: "Balanced drainage and retention",
    bulk_density: 1.4,
    porosity: 0.45,
};

const SANDY_LOAM: SoilProperties = SoilProperties {
    field_capacity: 0.28,
    wilting_point: 0.12,
    infiltration_rate: "Medium-High (15-75 mm/hr)",
    water_holding_capacity: "Medium-Low",
    description: "Moderate water retention",
    bulk_density: 1.5,
    porosity: 0.43,
};

impl SoilKind {
    /// Every known soil kind, in catalog order.
    pub const ALL: [SoilKind; 4] = [
        SoilKind::Sandy,
        SoilKind::Clay,
        SoilKind::Loam,
        SoilKind::SandyLoam,
    ];

    /// Canonical label as the service emits it.
    pub fn label(&self) -> &'static str {
        match self {
            SoilKind::Sandy => "Sandy",
            SoilKind::Clay => "Clay",
            SoilKind::Loam => "Loam",
            SoilKind::SandyLoam => "Sandy Loam",
        }
    }

    /// Parse a label back into a kind (case-insensitive).
    pub fn from_label(label: &str) -> Option<SoilKind> {
        let label = label.trim();
        SoilKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }

    /// Hydraulic properties for this kind.
    pub fn properties(&self) -> &'static SoilProperties {
        match self {
            SoilKind::Sandy => &SANDY,
            SoilKind::Clay => &CLAY,
            SoilKind::Loam => &LOAM,
            SoilKind::SandyLoam => &SANDY_LOAM,
        }
    }
}

impl std::fmt::Display for SoilKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
