//! Per-step completion predicates.
//!
//! One pure predicate per wizard step, called on every transition attempt.
//! A rejected advance is silent (the affordance is disabled upstream), so
//! these must be deterministic and side-effect free.

use crate::record::AggregateRecord;
use crate::wizard::WizardStep;

/// True when the record satisfies `step`'s completion requirements.
///
/// The review step has no requirements of its own; it is always
/// satisfiable.
pub fn step_complete(step: WizardStep, record: &AggregateRecord) -> bool {
    match step {
        WizardStep::PersonalInfo => personal_info_complete(record),
        WizardStep::Location => location_complete(record),
        WizardStep::Soil => soil_complete(record),
        WizardStep::Crop => crop_complete(record),
        WizardStep::FarmSize => farm_size_complete(record),
        WizardStep::Review => true,
    }
}

fn personal_info_complete(record: &AggregateRecord) -> bool {
    record.personal_info.as_ref().is_some_and(|personal| {
        !personal.farmer_name.trim().is_empty() && personal.experience.is_some()
    })
}

fn location_complete(record: &AggregateRecord) -> bool {
    record.location.as_ref().is_some_and(|location| {
        !location.address.trim().is_empty() && location.climate_zone.is_some()
    })
}

fn soil_complete(record: &AggregateRecord) -> bool {
    record
        .soil_type
        .as_deref()
        .is_some_and(|soil| !soil.trim().is_empty())
}

fn crop_complete(record: &AggregateRecord) -> bool {
    record
        .crop_info
        .as_ref()
        .is_some_and(|crop| !crop.name.trim().is_empty() && crop.planting_date.is_some())
}

fn farm_size_complete(record: &AggregateRecord) -> bool {
    record.farm_size.as_ref().is_some_and(|farm| {
        farm.area.is_some_and(|area| area > 0.0) && farm.irrigation_method.is_some()
    })
}
