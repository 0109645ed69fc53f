//! Agronomic reference data for AgriFlow.
//!
//! This crate holds the static vocabulary the intake wizard and the
//! recommendation views share:
//!
//! - [`SoilKind`]: the soil classification catalog with hydraulic properties
//! - [`CropProfile`]: the crop database (FAO-56 coefficients, growth stages)
//! - Shared enums: [`ClimateZone`], [`ExperienceLevel`], [`IrrigationMethod`]
//! - [`AreaUnit`]: farm-area units with conversion helpers
//!
//! Everything here is plain data - no I/O, no async. The wire labels match
//! what the recommendation service accepts and emits.

pub mod crop;
pub mod soil;
pub mod terms;
pub mod units;

// Re-export main types
pub use crop::{crop_catalog, crop_by_name, CropProfile};
pub use soil::{SoilKind, SoilProperties};
pub use terms::{ClimateZone, ExperienceLevel, IrrigationMethod};
pub use units::AreaUnit;
