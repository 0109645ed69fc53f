//! Farm-area units and conversions.

use serde::{Deserialize, Serialize};

/// Unit a farm area was entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    Hectares,
    Acres,
    SquareMeters,
}

impl AreaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Hectares => "hectares",
            AreaUnit::Acres => "acres",
            AreaUnit::SquareMeters => "square_meters",
        }
    }

    /// Convert an area in this unit to hectares.
    pub fn to_hectares(&self, area: f64) -> f64 {
        match self {
            AreaUnit::Hectares => area,
            AreaUnit::Acres => area * 0.405,
            AreaUnit::SquareMeters => area / 10_000.0,
        }
    }

    /// Convert an area between units.
    pub fn convert(&self, area: f64, to: AreaUnit) -> f64 {
        let hectares = self.to_hectares(area);
        match to {
            AreaUnit::Hectares => hectares,
            AreaUnit::Acres => hectares * 2.471,
            AreaUnit::SquareMeters => hectares * 10_000.0,
        }
    }
}
