//! Guided farm-intake wizard for AgriFlow.
//!
//! Collects a farmer's data across six validated steps, classifies a soil
//! photo through the remote service (with a manual fallback), and submits
//! the completed record for schedule generation:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 WizardState                  │
//! │   (AggregateRecord + cursor, merge-only)     │
//! └──────┬──────────────────────────┬────────────┘
//!        │                          │
//!        ▼                          ▼
//! ┌──────────────────┐      ┌───────────────┐
//! │ SoilClassification│      │ SubmissionGate│
//! │ Flow (step 3)     │      │ (step 6)      │
//! └──────┬───────────┘      └──────┬────────┘
//!        │                         │
//!        └───────────┬─────────────┘
//!                    ▼
//!          ┌──────────────────┐
//!          │ ScheduleBackend  │
//!          │ (Http / Mock)    │
//!          └──────────────────┘
//! ```
//!
//! The wizard owns the single [`AggregateRecord`]; section-level merges are
//! the only mutation primitive, and forward navigation is gated by the pure
//! per-step validators in [`validators`]. Results come back as raw JSON and
//! are handed to the `reporting` crate for normalization.

pub mod backend;
pub mod classify;
pub mod identity;
pub mod record;
pub mod submit;
pub mod validators;
pub mod wizard;

// Re-export main types
pub use backend::http::HttpBackend;
pub use backend::mock::{MockBackend, MockFailure};
pub use backend::traits::{
    BackendError, ProgressReceiver, ReportedSoilProperties, ScheduleBackend, SoilClassification,
    SoilImage,
};
pub use classify::{
    ClassificationConfig, ClassificationError, ClassificationPhase, SoilClassificationFlow,
    MAX_IMAGE_BYTES,
};
pub use identity::UserIdentity;
pub use record::{
    AggregateRecord, ClassificationMethod, CropInfo, CropPatch, FarmPatch, FarmSize,
    Location, LocationPatch, PersonalInfo, PersonalPatch, SectionPatch, SoilPatch,
};
pub use submit::{SubmissionGate, SubmissionReceipt, SubmitConfig, SubmitError};
pub use wizard::{WizardState, WizardStep};
