//! Soil classification flow (wizard step 3).
//!
//! Upload a soil photo, let the remote classifier label it, and write the
//! result into the wizard record - or, when anything goes wrong, drop the
//! user into manual selection after a short delay so step 3 is always
//! satisfiable. The flow is re-entrant: a result can be discarded and
//! retried with a new photo, and manual mode is reachable at any time.
//!
//! Only one classification attempt runs at a time; concurrent calls
//! coalesce into a no-op. An attempt epoch guards against stale
//! resolutions landing after the user cancelled or superseded the attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use agronomy::SoilKind;

use crate::backend::traits::{
    ProgressReceiver, ReportedSoilProperties, ScheduleBackend, SoilClassification, SoilImage,
};
use crate::record::{ClassificationMethod, SectionPatch, SoilPatch};
use crate::wizard::WizardState;

/// Upload size limit, enforced before any network interaction.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Tuning knobs for the classification flow.
#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    /// Outer deadline for upload + classification (the service may be
    /// cold-starting).
    pub request_timeout: Duration,
    /// Pause before a failed attempt flips into manual selection.
    pub manual_fallback_delay: Duration,
    /// Upload size limit in bytes.
    pub max_image_bytes: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(180),
            manual_fallback_delay: Duration::from_secs(2),
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

/// Error types for the classification flow.
///
/// Remote failures never surface here - they resolve into manual-selection
/// mode instead.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// Image rejected before upload
    #[error("Image too large: {size} bytes exceeds the {limit}-byte limit")]
    ImageTooLarge { size: usize, limit: usize },

    /// Not an accepted image content type
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
}

/// Where the flow currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationPhase {
    /// Nothing uploaded yet (or the last result was discarded).
    AwaitingImage,
    /// Image bytes are on the wire.
    Uploading,
    /// Upload finished; waiting on the classifier.
    Analyzing,
    /// A label was accepted (from the model or manual selection).
    Classified(SoilClassification),
    /// Listing every known soil type for the user to pick.
    ManualSelection,
}

/// The step-3 sub-process feeding `soil_type` into the wizard record.
#[derive(Clone)]
pub struct SoilClassificationFlow {
    backend: Arc<dyn ScheduleBackend>,
    wizard: WizardState,
    config: ClassificationConfig,
    phase: Arc<RwLock<ClassificationPhase>>,
    /// Bumped whenever an attempt is superseded; resolutions carrying an
    /// older epoch are discarded.
    attempt: Arc<AtomicU64>,
    in_flight: Arc<Mutex<()>>,
    progress: watch::Sender<u8>,
}

impl SoilClassificationFlow {
    pub fn new(backend: Arc<dyn ScheduleBackend>, wizard: WizardState) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            backend,
            wizard,
            config: ClassificationConfig::default(),
            phase: Arc::new(RwLock::new(ClassificationPhase::AwaitingImage)),
            attempt: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(Mutex::new(())),
            progress,
        }
    }

    /// Override the flow configuration.
    pub fn with_config(mut self, config: ClassificationConfig) -> Self {
        self.config = config;
        self
    }

    /// Current phase.
    pub async fn phase(&self) -> ClassificationPhase {
        self.phase.read().await.clone()
    }

    /// Subscribe to upload progress (percent, feedback only).
    pub fn progress(&self) -> ProgressReceiver {
        self.progress.subscribe()
    }

    /// The options offered in manual-selection mode.
    pub fn manual_options() -> &'static [SoilKind] {
        &SoilKind::ALL
    }

    /// Upload an image and classify it.
    ///
    /// Returns an error only for pre-upload rejections (size, content
    /// type); those leave all state untouched. Remote failures resolve
    /// into [`ClassificationPhase::ManualSelection`] after the configured
    /// delay. A call while another attempt is in flight is a no-op.
    pub async fn classify(&self, image: SoilImage) -> Result<(), ClassificationError> {
        if image.len() > self.config.max_image_bytes {
            warn!(size = image.len(), "soil image rejected: over upload limit");
            return Err(ClassificationError::ImageTooLarge {
                size: image.len(),
                limit: self.config.max_image_bytes,
            });
        }
        if !image.is_supported_type() {
            return Err(ClassificationError::UnsupportedType(
                image.content_type.clone(),
            ));
        }

        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("classification already in flight; ignoring");
            return Ok(());
        };

        let epoch = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        *self.phase.write().await = ClassificationPhase::Uploading;
        let _ = self.progress.send(0);
        self.watch_upload_completion(epoch);

        let outcome = timeout(
            self.config.request_timeout,
            self.backend.classify_soil(&image, Some(self.progress.clone())),
        )
        .await;

        if self.attempt.load(Ordering::SeqCst) != epoch {
            debug!("stale classification resolution discarded");
            return Ok(());
        }

        match outcome {
            Ok(Ok(classification)) => {
                self.wizard
                    .merge_section(SectionPatch::Soil(SoilPatch {
                        soil_type: Some(classification.predicted_label.clone()),
                        soil_confidence: Some(classification.confidence.clamp(0.0, 100.0).round()
                            as u8),
                        method: Some(ClassificationMethod::ModelInference),
                    }))
                    .await;
                info!(
                    soil = %classification.predicted_label,
                    confidence = classification.confidence,
                    "soil classification accepted"
                );
                *self.phase.write().await = ClassificationPhase::Classified(classification);
            }
            Ok(Err(err)) => {
                warn!(error = %err, "soil classification failed; offering manual selection");
                self.fall_back_to_manual(epoch).await;
            }
            Err(_) => {
                warn!("soil classification timed out; offering manual selection");
                self.fall_back_to_manual(epoch).await;
            }
        }
        Ok(())
    }

    /// Resolve a failed/timed-out attempt into manual selection after the
    /// configured delay, unless a newer attempt has superseded this epoch.
    async fn fall_back_to_manual(&self, epoch: u64) {
        sleep(self.config.manual_fallback_delay).await;
        if self.attempt.load(Ordering::SeqCst) != epoch {
            debug!("stale manual fallback discarded");
            return;
        }
        *self.phase.write().await = ClassificationPhase::ManualSelection;
    }

    /// Pick a soil type from the catalog. Supersedes any pending
    /// classification attempt.
    pub async fn select_manual(&self, soil: SoilKind) {
        self.attempt.fetch_add(1, Ordering::SeqCst);

        self.wizard
            .merge_section(SectionPatch::Soil(SoilPatch {
                soil_type: Some(soil.label().to_string()),
                soil_confidence: Some(100),
                method: Some(ClassificationMethod::ManualSelection),
            }))
            .await;

        let props = soil.properties();
        let classification = SoilClassification {
            predicted_label: soil.label().to_string(),
            confidence: 100.0,
            method: "manual_selection".to_string(),
            properties: ReportedSoilProperties {
                water_holding_capacity: props.water_holding_capacity.to_string(),
                infiltration_rate: props.infiltration_rate.to_string(),
                field_capacity: props.field_capacity,
                description: props.description.to_string(),
            },
        };
        info!(soil = %soil, "manual soil selection");
        *self.phase.write().await = ClassificationPhase::Classified(classification);
    }

    /// Show the manual-selection list without waiting for a failure.
    pub async fn enter_manual(&self) {
        *self.phase.write().await = ClassificationPhase::ManualSelection;
    }

    /// Return from the manual list to the upload prompt.
    pub async fn back_to_upload(&self) {
        *self.phase.write().await = ClassificationPhase::AwaitingImage;
    }

    /// Drop the current result and start over with a new photo.
    pub async fn discard_result(&self) {
        self.cancel().await;
        let _ = self.progress.send(0);
    }

    /// Abandon the flow (navigation away). Any still-pending resolution is
    /// discarded instead of being applied to an out-of-scope record.
    pub async fn cancel(&self) {
        self.attempt.fetch_add(1, Ordering::SeqCst);
        *self.phase.write().await = ClassificationPhase::AwaitingImage;
    }

    /// Flip Uploading into Analyzing once the upload hits 100%.
    fn watch_upload_completion(&self, epoch: u64) {
        let mut rx = self.progress.subscribe();
        let phase = Arc::clone(&self.phase);
        let attempt = Arc::clone(&self.attempt);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if *rx.borrow() >= 100 {
                    if attempt.load(Ordering::SeqCst) == epoch {
                        let mut phase = phase.write().await;
                        if *phase == ClassificationPhase::Uploading {
                            *phase = ClassificationPhase::Analyzing;
                        }
                    }
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockFailure};
    use crate::validators;
    use crate::wizard::WizardStep;

    fn image() -> SoilImage {
        SoilImage::new("soil.jpg", "image/jpeg", vec![0u8; 1024])
    }

    fn fast_config() -> ClassificationConfig {
        ClassificationConfig {
            request_timeout: Duration::from_millis(500),
            manual_fallback_delay: Duration::from_millis(10),
            ..Default::default()
        }
    }

    fn flow_with(backend: MockBackend) -> (SoilClassificationFlow, Arc<MockBackend>, WizardState) {
        let backend = Arc::new(backend);
        let wizard = WizardState::new();
        let flow = SoilClassificationFlow::new(backend.clone(), wizard.clone())
            .with_config(fast_config());
        (flow, backend, wizard)
    }

    #[tokio::test]
    async fn test_oversized_image_rejected_before_upload() {
        let (flow, backend, wizard) = flow_with(MockBackend::default());
        let huge = SoilImage::new("soil.jpg", "image/jpeg", vec![0u8; MAX_IMAGE_BYTES + 1]);

        let err = flow.classify(huge).await.unwrap_err();
        assert!(matches!(err, ClassificationError::ImageTooLarge { .. }));
        // No network interaction, no state change.
        assert_eq!(backend.classify_calls(), 0);
        assert_eq!(flow.phase().await, ClassificationPhase::AwaitingImage);
        assert!(wizard.record().await.soil_type.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected() {
        let (flow, backend, _) = flow_with(MockBackend::default());
        let pdf = SoilImage::new("soil.pdf", "application/pdf", vec![0u8; 64]);
        let err = flow.classify(pdf).await.unwrap_err();
        assert!(matches!(err, ClassificationError::UnsupportedType(_)));
        assert_eq!(backend.classify_calls(), 0);
    }

    #[tokio::test]
    async fn test_accepted_classification_writes_record() {
        let (flow, _, wizard) = flow_with(MockBackend::default());
        flow.classify(image()).await.unwrap();

        let record = wizard.record().await;
        assert_eq!(record.soil_type.as_deref(), Some("Loam"));
        assert_eq!(record.soil_confidence, Some(70));
        assert_eq!(
            record.soil_classification_method,
            Some(ClassificationMethod::ModelInference)
        );
        assert!(validators::step_complete(WizardStep::Soil, &record));
        assert!(matches!(
            flow.phase().await,
            ClassificationPhase::Classified(_)
        ));
    }

    #[tokio::test]
    async fn test_failure_forces_manual_selection() {
        let (flow, _, wizard) = flow_with(
            MockBackend::default().with_classify_failure(MockFailure::Network("down".into())),
        );
        flow.classify(image()).await.unwrap();

        // The wizard is not stuck: manual selection is forced on, and
        // picking any soil type satisfies the step.
        assert_eq!(flow.phase().await, ClassificationPhase::ManualSelection);
        assert!(wizard.record().await.soil_type.is_none());

        flow.select_manual(SoilKind::SandyLoam).await;
        let record = wizard.record().await;
        assert_eq!(record.soil_type.as_deref(), Some("Sandy Loam"));
        assert_eq!(record.soil_confidence, Some(100));
        assert_eq!(
            record.soil_classification_method,
            Some(ClassificationMethod::ManualSelection)
        );
        assert!(validators::step_complete(WizardStep::Soil, &record));
    }

    #[tokio::test]
    async fn test_timeout_forces_manual_selection() {
        let backend = MockBackend::default().with_latency(Duration::from_millis(100));
        let (flow, _, _) = flow_with(backend);
        let flow = flow.with_config(ClassificationConfig {
            request_timeout: Duration::from_millis(20),
            manual_fallback_delay: Duration::from_millis(5),
            ..Default::default()
        });

        flow.classify(image()).await.unwrap();
        assert_eq!(flow.phase().await, ClassificationPhase::ManualSelection);
    }

    #[tokio::test]
    async fn test_concurrent_attempts_coalesce() {
        let (flow, backend, _) =
            flow_with(MockBackend::default().with_latency(Duration::from_millis(50)));

        let (a, b) = tokio::join!(flow.classify(image()), flow.classify(image()));
        a.unwrap();
        b.unwrap();

        assert_eq!(backend.classify_calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_resolution_discarded_after_cancel() {
        let (flow, _, wizard) =
            flow_with(MockBackend::default().with_latency(Duration::from_millis(80)));

        let pending = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.classify(image()).await })
        };
        sleep(Duration::from_millis(20)).await;
        flow.cancel().await;
        pending.await.unwrap().unwrap();

        // The resolution arrived after cancellation and was dropped.
        assert!(wizard.record().await.soil_type.is_none());
        assert_eq!(flow.phase().await, ClassificationPhase::AwaitingImage);
    }

    #[tokio::test]
    async fn test_manual_selection_supersedes_pending_attempt() {
        let (flow, _, wizard) =
            flow_with(MockBackend::default().with_latency(Duration::from_millis(80)));

        let pending = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.classify(image()).await })
        };
        sleep(Duration::from_millis(20)).await;
        flow.select_manual(SoilKind::Clay).await;
        pending.await.unwrap().unwrap();

        let record = wizard.record().await;
        assert_eq!(record.soil_type.as_deref(), Some("Clay"));
        assert_eq!(
            record.soil_classification_method,
            Some(ClassificationMethod::ManualSelection)
        );
    }

    #[tokio::test]
    async fn test_retry_after_discard() {
        let (flow, backend, wizard) = flow_with(MockBackend::default());

        flow.classify(image()).await.unwrap();
        flow.discard_result().await;
        assert_eq!(flow.phase().await, ClassificationPhase::AwaitingImage);
        // The record keeps the previous label until a new result lands.
        assert_eq!(wizard.record().await.soil_type.as_deref(), Some("Loam"));

        flow.classify(image()).await.unwrap();
        assert_eq!(backend.classify_calls(), 2);
        assert!(matches!(
            flow.phase().await,
            ClassificationPhase::Classified(_)
        ));
    }

    #[tokio::test]
    async fn test_upload_progress_reaches_completion() {
        let (flow, _, _) = flow_with(MockBackend::default());
        let rx = flow.progress();
        flow.classify(image()).await.unwrap();
        assert_eq!(*rx.borrow(), 100);
    }

    #[tokio::test]
    async fn test_manual_options_list_every_soil() {
        assert_eq!(SoilClassificationFlow::manual_options().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_classification_never_blocks_step_three() {
        use crate::record::{LocationPatch, PersonalPatch};
        use agronomy::{ClimateZone, ExperienceLevel};

        let (flow, _, wizard) = flow_with(
            MockBackend::default().with_classify_failure(MockFailure::Timeout),
        );

        // Walk the wizard to the soil step.
        wizard
            .merge_section(SectionPatch::Personal(PersonalPatch {
                farmer_name: Some("Asha".into()),
                experience: Some(ExperienceLevel::Beginner),
                ..Default::default()
            }))
            .await;
        wizard.advance().await;
        wizard
            .merge_section(SectionPatch::Location(LocationPatch {
                address: Some("Phalodi".into()),
                climate_zone: Some(ClimateZone::Arid),
                ..Default::default()
            }))
            .await;
        wizard.advance().await;
        assert_eq!(wizard.step().await, WizardStep::Soil);

        flow.classify(image()).await.unwrap();

        // Still on step 3, manual selection forced, advance still blocked.
        assert_eq!(wizard.step().await, WizardStep::Soil);
        assert_eq!(flow.phase().await, ClassificationPhase::ManualSelection);
        assert_eq!(wizard.advance().await, WizardStep::Soil);

        // Any manual pick unblocks the step.
        flow.select_manual(SoilKind::Loam).await;
        assert_eq!(wizard.advance().await, WizardStep::Crop);
    }
}
