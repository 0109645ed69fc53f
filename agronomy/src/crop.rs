//! Crop database.
//!
//! FAO-56 crop coefficients, growth-stage labels, and rooting/depletion
//! constants for the crops the recommendation service supports. Perennials
//! carry a nominal 365-day season length.

/// Agronomic profile of a supported crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    /// Crop coefficient, initial stage
    pub kc_initial: f64,
    /// Crop coefficient, development stage
    pub kc_development: f64,
    /// Crop coefficient, mid-season
    pub kc_mid: f64,
    /// Crop coefficient, late season
    pub kc_late: f64,
    /// Human-readable growth-stage labels, in order
    pub growth_stages: &'static [&'static str],
    /// Effective rooting depth (m)
    pub rooting_depth: f64,
    /// Management-allowed depletion fraction before yield stress
    pub critical_depletion: f64,
    /// Season length in days
    pub season_length: u32,
}

impl CropProfile {
    /// Label for a growth-stage index, if in range.
    pub fn stage_label(&self, index: usize) -> Option<&'static str> {
        self.growth_stages.get(index).copied()
    }
}

static CATALOG: &[CropProfile] = &[
    CropProfile {
        name: "Tomato",
        kc_initial: 0.6,
        kc_development: 0.8,
        kc_mid: 1.15,
        kc_late: 0.8,
        growth_stages: &[
            "Germination (0-15 days)",
            "Vegetative (16-45 days)",
            "Flowering (46-75 days)",
            "Fruiting (76-120 days)",
        ],
        rooting_depth: 1.0,
        critical_depletion: 0.5,
        season_length: 120,
    },
    CropProfile {
        name: "Wheat",
        kc_initial: 0.4,
        kc_development: 0.7,
        kc_mid: 1.15,
        kc_late: 0.4,
        growth_stages: &[
            "Emergence (0-20 days)",
            "Tillering (21-60 days)",
            "Heading (61-100 days)",
            "Maturity (101-130 days)",
        ],
        rooting_depth: 1.2,
        critical_depletion: 0.6,
        season_length: 130,
    },
    CropProfile {
        name: "Rice",
        kc_initial: 1.15,
        kc_development: 1.2,
        kc_mid: 1.2,
        kc_late: 0.9,
        growth_stages: &[
            "Nursery (0-30 days)",
            "Vegetative (31-65 days)",
            "Reproductive (66-95 days)",
            "Maturity (96-120 days)",
        ],
        rooting_depth: 0.5,
        critical_depletion: 0.2,
        season_length: 120,
    },
    CropProfile {
        name: "Corn",
        kc_initial: 0.3,
        kc_development: 0.7,
        kc_mid: 1.2,
        kc_late: 0.6,
        growth_stages: &[
            "Emergence (0-25 days)",
            "Vegetative (26-60 days)",
            "Tasseling (61-90 days)",
            "Maturity (91-125 days)",
        ],
        rooting_depth: 1.0,
        critical_depletion: 0.55,
        season_length: 125,
    },
    CropProfile {
        name: "Coconut",
        kc_initial: 0.8,
        kc_development: 0.9,
        kc_mid: 1.0,
        kc_late: 1.0,
        growth_stages: &[
            "Young Palm (0-5 years)",
            "Bearing Palm (6-15 years)",
            "Prime Bearing (16-50 years)",
            "Old Palm (50+ years)",
        ],
        rooting_depth: 2.0,
        critical_depletion: 0.4,
        season_length: 365,
    },
    CropProfile {
        name: "Arecanut",
        kc_initial: 0.7,
        kc_development: 0.8,
        kc_mid: 0.95,
        kc_late: 0.9,
        growth_stages: &[
            "Young Palm (0-7 years)",
            "Bearing Palm (8-20 years)",
            "Prime Bearing (21-40 years)",
            "Old Palm (40+ years)",
        ],
        rooting_depth: 1.5,
        critical_depletion: 0.4,
        season_length: 365,
    },
    CropProfile {
        name: "Banana",
        kc_initial: 0.5,
        kc_development: 0.75,
        kc_mid: 1.1,
        kc_late: 0.9,
        growth_stages: &[
            "Planting (0-60 days)",
            "Vegetative (61-150 days)",
            "Flowering (151-210 days)",
            "Fruiting (211-300 days)",
        ],
        rooting_depth: 0.8,
        critical_depletion: 0.35,
        season_length: 300,
    },
    CropProfile {
        name: "Sugarcane",
        kc_initial: 0.4,
        kc_development: 0.8,
        kc_mid: 1.25,
        kc_late: 0.75,
        growth_stages: &[
            "Germination (0-45 days)",
            "Tillering (46-120 days)",
            "Grand Growth (121-270 days)",
            "Maturity (271-365 days)",
        ],
        rooting_depth: 1.2,
        critical_depletion: 0.65,
        season_length: 365,
    },
    CropProfile {
        name: "Cotton",
        kc_initial: 0.35,
        kc_development: 0.7,
        kc_mid: 1.15,
        kc_late: 0.5,
        growth_stages: &[
            "Emergence (0-30 days)",
            "Squaring (31-65 days)",
            "Flowering (66-125 days)",
            "Boll Opening (126-180 days)",
        ],
        rooting_depth: 1.0,
        critical_depletion: 0.65,
        season_length: 180,
    },
    CropProfile {
        name: "Groundnut",
        kc_initial: 0.4,
        kc_development: 0.7,
        kc_mid: 1.15,
        kc_late: 0.6,
        growth_stages: &[
            "Emergence (0-25 days)",
            "Vegetative (26-45 days)",
            "Flowering (46-75 days)",
            "Pod Development (76-110 days)",
        ],
        rooting_depth: 0.6,
        critical_depletion: 0.5,
        season_length: 110,
    },
    CropProfile {
        name: "Chili",
        kc_initial: 0.6,
        kc_development: 0.8,
        kc_mid: 1.05,
        kc_late: 0.8,
        growth_stages: &[
            "Nursery (0-35 days)",
            "Vegetative (36-65 days)",
            "Flowering (66-95 days)",
            "Fruiting (96-150 days)",
        ],
        rooting_depth: 0.7,
        critical_depletion: 0.45,
        season_length: 150,
    },
    CropProfile {
        name: "Onion",
        kc_initial: 0.7,
        kc_development: 0.85,
        kc_mid: 1.05,
        kc_late: 0.75,
        growth_stages: &[
            "Establishment (0-25 days)",
            "Vegetative (26-75 days)",
            "Bulb Development (76-110 days)",
            "Maturity (111-130 days)",
        ],
        rooting_depth: 0.4,
        critical_depletion: 0.3,
        season_length: 130,
    },
    CropProfile {
        name: "Turmeric",
        kc_initial: 0.5,
        kc_development: 0.75,
        kc_mid: 1.0,
        kc_late: 0.6,
        growth_stages: &[
            "Sprouting (0-45 days)",
            "Vegetative (46-120 days)",
            "Rhizome Development (121-210 days)",
            "Maturity (211-270 days)",
        ],
        rooting_depth: 0.5,
        critical_depletion: 0.4,
        season_length: 270,
    },
    CropProfile {
        name: "Cardamom",
        kc_initial: 0.6,
        kc_development: 0.75,
        kc_mid: 0.9,
        kc_late: 0.85,
        growth_stages: &[
            "Young Plant (0-3 years)",
            "Bearing Plant (4-10 years)",
            "Prime Bearing (11-20 years)",
            "Old Plant (20+ years)",
        ],
        rooting_depth: 0.8,
        critical_depletion: 0.3,
        season_length: 365,
    },
    CropProfile {
        name: "Coffee",
        kc_initial: 0.7,
        kc_development: 0.8,
        kc_mid: 0.95,
        kc_late: 0.9,
        growth_stages: &[
            "Young Plant (0-3 years)",
            "Bearing Plant (4-15 years)",
            "Prime Bearing (16-30 years)",
            "Old Plant (30+ years)",
        ],
        rooting_depth: 1.5,
        critical_depletion: 0.4,
        season_length: 365,
    },
    CropProfile {
        name: "Mango",
        kc_initial: 0.6,
        kc_development: 0.75,
        kc_mid: 0.9,
        kc_late: 0.85,
        growth_stages: &[
            "Young Tree (0-5 years)",
            "Bearing Tree (6-15 years)",
            "Prime Bearing (16-40 years)",
            "Old Tree (40+ years)",
        ],
        rooting_depth: 2.5,
        critical_depletion: 0.5,
        season_length: 365,
    },
    CropProfile {
        name: "Papaya",
        kc_initial: 0.6,
        kc_development: 0.8,
        kc_mid: 1.0,
        kc_late: 0.9,
        growth_stages: &[
            "Seedling (0-60 days)",
            "Vegetative (61-180 days)",
            "Flowering (181-270 days)",
            "Fruiting (271-365 days)",
        ],
        rooting_depth: 1.0,
        critical_depletion: 0.4,
        season_length: 365,
    },
    CropProfile {
        name: "Jackfruit",
        kc_initial: 0.6,
        kc_development: 0.75,
        kc_mid: 0.9,
        kc_late: 0.85,
        growth_stages: &[
            "Young Tree (0-7 years)",
            "Bearing Tree (8-20 years)",
            "Prime Bearing (21-50 years)",
            "Old Tree (50+ years)",
        ],
        rooting_depth: 2.0,
        critical_depletion: 0.5,
        season_length: 365,
    },
    CropProfile {
        name: "Drumstick",
        kc_initial: 0.5,
        kc_development: 0.7,
        kc_mid: 0.85,
        kc_late: 0.8,
        growth_stages: &[
            "Seedling (0-90 days)",
            "Vegetative (91-180 days)",
            "Flowering (181-270 days)",
            "Pod Development (271-365 days)",
        ],
        rooting_depth: 1.5,
        critical_depletion: 0.6,
        season_length: 365,
    },
    CropProfile {
        name: "Ragi",
        kc_initial: 0.4,
        kc_development: 0.7,
        kc_mid: 1.0,
        kc_late: 0.5,
        growth_stages: &[
            "Emergence (0-20 days)",
            "Tillering (21-45 days)",
            "Heading (46-75 days)",
            "Maturity (76-120 days)",
        ],
        rooting_depth: 0.8,
        critical_depletion: 0.6,
        season_length: 120,
    },
    CropProfile {
        name: "Jowar",
        kc_initial: 0.35,
        kc_development: 0.7,
        kc_mid: 1.1,
        kc_late: 0.55,
        growth_stages: &[
            "Emergence (0-25 days)",
            "Vegetative (26-60 days)",
            "Heading (61-90 days)",
            "Maturity (91-115 days)",
        ],
        rooting_depth: 1.0,
        critical_depletion: 0.6,
        season_length: 115,
    },
    CropProfile {
        name: "Bajra",
        kc_initial: 0.35,
        kc_development: 0.7,
        kc_mid: 1.05,
        kc_late: 0.55,
        growth_stages: &[
            "Emergence (0-20 days)",
            "Vegetative (26-50 days)",
            "Heading (51-75 days)",
            "Maturity (76-100 days)",
        ],
        rooting_depth: 1.2,
        critical_depletion: 0.65,
        season_length: 100,
    },
];

/// The full crop catalog, in service order.
pub fn crop_catalog() -> &'static [CropProfile] {
    CATALOG
}

/// Look up a crop by name (case-insensitive).
pub fn crop_by_name(name: &str) -> Option<&'static CropProfile> {
    let name = name.trim();
    CATALOG.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let rice = crop_by_name("rice").unwrap();
        assert_eq!(rice.name, "Rice");
        assert_eq!(rice.season_length, 120);
        assert!(crop_by_name("Quinoa").is_none());
    }

    #[test]
    fn test_stage_labels() {
        let wheat = crop_by_name("Wheat").unwrap();
        assert_eq!(wheat.stage_label(0), Some("Emergence (0-20 days)"));
        assert_eq!(wheat.stage_label(4), None);
    }

    #[test]
    fn test_coefficients_sane() {
        for crop in crop_catalog() {
            assert!(crop.kc_initial > 0.0 && crop.kc_mid <= 1.3, "{}", crop.name);
            assert!(crop.critical_depletion > 0.0 && crop.critical_depletion < 1.0);
            assert_eq!(crop.growth_stages.len(), 4, "{}", crop.name);
        }
    }
}
