//! Wizard state machine.
//!
//! A linear chain of six steps with a single cursor. Forward transitions
//! are gated by the current step's validator; backward navigation is never
//! gated. The state lives behind a cloneable handle so the classification
//! flow and the submission gate can share it.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::record::{AggregateRecord, SectionPatch};
use crate::validators;

/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    PersonalInfo,
    Location,
    Soil,
    Crop,
    FarmSize,
    Review,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::PersonalInfo;
    pub const LAST: WizardStep = WizardStep::Review;
    pub const COUNT: u8 = 6;

    /// 1-based position, matching the "Step N of 6" readout.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::PersonalInfo => 1,
            WizardStep::Location => 2,
            WizardStep::Soil => 3,
            WizardStep::Crop => 4,
            WizardStep::FarmSize => 5,
            WizardStep::Review => 6,
        }
    }

    fn next(&self) -> WizardStep {
        match self {
            WizardStep::PersonalInfo => WizardStep::Location,
            WizardStep::Location => WizardStep::Soil,
            WizardStep::Soil => WizardStep::Crop,
            WizardStep::Crop => WizardStep::FarmSize,
            WizardStep::FarmSize => WizardStep::Review,
            WizardStep::Review => WizardStep::Review,
        }
    }

    fn previous(&self) -> WizardStep {
        match self {
            WizardStep::PersonalInfo => WizardStep::PersonalInfo,
            WizardStep::Location => WizardStep::PersonalInfo,
            WizardStep::Soil => WizardStep::Location,
            WizardStep::Crop => WizardStep::Soil,
            WizardStep::FarmSize => WizardStep::Crop,
            WizardStep::Review => WizardStep::FarmSize,
        }
    }
}

#[derive(Debug)]
struct WizardInner {
    step: WizardStep,
    record: AggregateRecord,
}

/// Cloneable handle to the wizard's state.
#[derive(Debug, Clone)]
pub struct WizardState {
    inner: Arc<RwLock<WizardInner>>,
}

impl WizardState {
    /// Fresh wizard: cursor at step 1, empty record.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(WizardInner {
                step: WizardStep::FIRST,
                record: AggregateRecord::default(),
            })),
        }
    }

    /// Current step.
    pub async fn step(&self) -> WizardStep {
        self.inner.read().await.step
    }

    /// Snapshot of the accumulated record.
    pub async fn record(&self) -> AggregateRecord {
        self.inner.read().await.record.clone()
    }

    /// Completion percentage for the progress header.
    pub async fn progress_percent(&self) -> u8 {
        let step = self.step().await;
        (step.number() as u16 * 100 / WizardStep::COUNT as u16) as u8
    }

    /// True when the current step's validator accepts the record.
    pub async fn current_step_complete(&self) -> bool {
        let inner = self.inner.read().await;
        validators::step_complete(inner.step, &inner.record)
    }

    /// Move forward one step if the current step validates and we are not
    /// already at review. Safe to call regardless; a blocked advance is a
    /// no-op, never an error.
    pub async fn advance(&self) -> WizardStep {
        let mut inner = self.inner.write().await;
        if inner.step != WizardStep::LAST && validators::step_complete(inner.step, &inner.record) {
            inner.step = inner.step.next();
        } else {
            debug!(step = inner.step.number(), "advance blocked");
        }
        inner.step
    }

    /// Move back one step. Never gated; clamped at step 1.
    pub async fn retreat(&self) -> WizardStep {
        let mut inner = self.inner.write().await;
        inner.step = inner.step.previous();
        inner.step
    }

    /// Merge a section patch into the record.
    pub async fn merge_section(&self, patch: SectionPatch) {
        let mut inner = self.inner.write().await;
        inner.record.merge_section(patch);
    }

    /// Clear the cursor and record (logout or new-schedule start).
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.step = WizardStep::FIRST;
        inner.record = AggregateRecord::default();
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        CropPatch, FarmPatch, LocationPatch, PersonalPatch, SoilPatch,
    };
    use agronomy::{ClimateZone, ExperienceLevel, IrrigationMethod};
    use chrono::NaiveDate;

    async fn complete_step_one(wizard: &WizardState) {
        wizard
            .merge_section(SectionPatch::Personal(PersonalPatch {
                farmer_name: Some("Asha".into()),
                experience: Some(ExperienceLevel::Intermediate),
                ..Default::default()
            }))
            .await;
    }

    #[tokio::test]
    async fn test_advance_blocked_until_valid() {
        let wizard = WizardState::new();
        assert_eq!(wizard.advance().await, WizardStep::PersonalInfo);

        complete_step_one(&wizard).await;
        assert_eq!(wizard.advance().await, WizardStep::Location);
    }

    #[tokio::test]
    async fn test_retreat_always_allowed_and_clamped() {
        let wizard = WizardState::new();
        assert_eq!(wizard.retreat().await, WizardStep::PersonalInfo);

        complete_step_one(&wizard).await;
        wizard.advance().await;
        assert_eq!(wizard.retreat().await, WizardStep::PersonalInfo);
    }

    #[tokio::test]
    async fn test_data_survives_backward_navigation() {
        let wizard = WizardState::new();
        complete_step_one(&wizard).await;
        wizard.advance().await;
        wizard.retreat().await;
        wizard.advance().await;

        let record = wizard.record().await;
        assert_eq!(record.personal_info.unwrap().farmer_name, "Asha");
        assert_eq!(wizard.step().await, WizardStep::Location);
    }

    #[tokio::test]
    async fn test_full_walk_to_review() {
        let wizard = WizardState::new();
        complete_step_one(&wizard).await;
        wizard.advance().await;

        wizard
            .merge_section(SectionPatch::Location(LocationPatch {
                address: Some("Phalodi".into()),
                climate_zone: Some(ClimateZone::Arid),
                ..Default::default()
            }))
            .await;
        wizard.advance().await;

        wizard
            .merge_section(SectionPatch::Soil(SoilPatch {
                soil_type: Some("Sandy Loam".into()),
                soil_confidence: Some(78),
                ..Default::default()
            }))
            .await;
        wizard.advance().await;

        wizard
            .merge_section(SectionPatch::Crop(CropPatch {
                name: Some("Rice".into()),
                growth_stage: Some(1),
                planting_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            }))
            .await;
        wizard.advance().await;

        wizard
            .merge_section(SectionPatch::Farm(FarmPatch {
                area: Some(10.0),
                irrigation_method: Some(IrrigationMethod::Drip),
                ..Default::default()
            }))
            .await;
        wizard.advance().await;

        assert_eq!(wizard.step().await, WizardStep::Review);
        assert_eq!(wizard.progress_percent().await, 100);
        // Review is terminal for forward progress.
        assert_eq!(wizard.advance().await, WizardStep::Review);
        // But retreat from review stays legal.
        assert_eq!(wizard.retreat().await, WizardStep::FarmSize);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let wizard = WizardState::new();
        complete_step_one(&wizard).await;
        wizard.advance().await;
        wizard.reset().await;

        assert_eq!(wizard.step().await, WizardStep::PersonalInfo);
        assert_eq!(wizard.record().await, AggregateRecord::default());
    }
}
