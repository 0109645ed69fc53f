//! The aggregate intake record and its section patches.
//!
//! One record accumulates everything the wizard collects. Sections stay
//! `None` until their step first writes them and persist across backward
//! navigation; the only mutation primitive is a section-level merge that
//! overwrites exactly the fields a patch carries, never siblings. The serde
//! shape matches the JSON payload the recommendation service accepts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use agronomy::{AreaUnit, ClimateZone, ExperienceLevel, IrrigationMethod};

/// How the soil type entered the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Accepted from the image classifier.
    ModelInference,
    /// Picked from the manual fallback list.
    ManualSelection,
}

/// Everything collected across the wizard, one optional section per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    // Soil fields live at the top level of the payload, not in a nested
    // object, matching the service's expected shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_classification_method: Option<ClassificationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_info: Option<CropInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_size: Option<FarmSize>,
}

/// Step 1: who is farming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub farmer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: String,
}

/// Step 2: where the farm is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate_zone: Option<ClimateZone>,
}

/// Step 4: what is growing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub growth_stage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
}

/// Step 5: how big and how watered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default)]
    pub unit: AreaUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_method: Option<IrrigationMethod>,
}

/// A section-level merge. Only fields carried as `Some` are written.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPatch {
    Personal(PersonalPatch),
    Location(LocationPatch),
    Soil(SoilPatch),
    Crop(CropPatch),
    Farm(FarmPatch),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalPatch {
    pub farmer_name: Option<String>,
    pub experience: Option<ExperienceLevel>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPatch {
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub climate_zone: Option<ClimateZone>,
}

impl LocationPatch {
    /// Patch for a resolved GPS fix. The address field is synthesized so the
    /// step-2 validator applies uniformly regardless of input method.
    pub fn from_gps_fix(latitude: f64, longitude: f64) -> Self {
        Self {
            address: Some(format!("GPS: {:.4}, {:.4}", latitude, longitude)),
            latitude: Some(format!("{:.6}", latitude)),
            longitude: Some(format!("{:.6}", longitude)),
            climate_zone: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilPatch {
    pub soil_type: Option<String>,
    pub soil_confidence: Option<u8>,
    pub method: Option<ClassificationMethod>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropPatch {
    pub name: Option<String>,
    pub growth_stage: Option<u32>,
    pub planting_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmPatch {
    pub area: Option<f64>,
    pub unit: Option<AreaUnit>,
    pub irrigation_method: Option<IrrigationMethod>,
}

impl AggregateRecord {
    /// Merge a section patch, preserving sibling fields already present.
    pub fn merge_section(&mut self, patch: SectionPatch) {
        match patch {
            SectionPatch::Personal(p) => {
                let section = self.personal_info.get_or_insert_with(Default::default);
                if let Some(name) = p.farmer_name {
                    section.farmer_name = name;
                }
                if let Some(experience) = p.experience {
                    section.experience = Some(experience);
                }
                if let Some(email) = p.contact_email {
                    section.contact_email = Some(email);
                }
                if let Some(phone) = p.phone {
                    section.phone = phone;
                }
            }
            SectionPatch::Location(p) => {
                let section = self.location.get_or_insert_with(Default::default);
                if let Some(address) = p.address {
                    section.address = address;
                }
                if let Some(latitude) = p.latitude {
                    section.latitude = Some(latitude);
                }
                if let Some(longitude) = p.longitude {
                    section.longitude = Some(longitude);
                }
                if let Some(zone) = p.climate_zone {
                    section.climate_zone = Some(zone);
                }
            }
            SectionPatch::Soil(p) => {
                if let Some(soil_type) = p.soil_type {
                    self.soil_type = Some(soil_type);
                }
                if let Some(confidence) = p.soil_confidence {
                    self.soil_confidence = Some(confidence.min(100));
                }
                if let Some(method) = p.method {
                    self.soil_classification_method = Some(method);
                }
            }
            SectionPatch::Crop(p) => {
                let section = self.crop_info.get_or_insert_with(Default::default);
                if let Some(name) = p.name {
                    section.name = name;
                }
                if let Some(stage) = p.growth_stage {
                    section.growth_stage = stage;
                }
                if let Some(date) = p.planting_date {
                    section.planting_date = Some(date);
                }
            }
            SectionPatch::Farm(p) => {
                let section = self.farm_size.get_or_insert_with(Default::default);
                if let Some(area) = p.area {
                    section.area = Some(area);
                }
                if let Some(unit) = p.unit {
                    section.unit = unit;
                }
                if let Some(method) = p.irrigation_method {
                    section.irrigation_method = Some(method);
                }
            }
        }
    }
}
