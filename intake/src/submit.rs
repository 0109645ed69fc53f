//! Final submission of the completed record.
//!
//! One submission in flight at most; repeat calls while a request is
//! pending are rejected without a second transmission. Failures leave the
//! wizard record and cursor untouched so a retry needs no re-entry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::backend::traits::{BackendError, ScheduleBackend};
use crate::identity::UserIdentity;
use crate::wizard::WizardState;
use reporting::ScheduleSource;

/// Tuning knobs for submission.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Outer deadline for schedule generation (the service may be
    /// cold-starting; the model run itself takes a minute or more).
    pub request_timeout: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(180),
        }
    }
}

/// Error types for submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A submission is already pending; nothing was transmitted.
    #[error("A submission is already in flight")]
    InFlight,

    /// The service did not answer in time. It may be cold-starting; the
    /// record is preserved, try again in a few minutes.
    #[error("The recommendation service timed out; it may be starting up - try again shortly")]
    ServiceUnavailable,

    /// Any other submission failure. The record is preserved.
    #[error("Schedule generation failed: {0}")]
    SubmissionFailed(String),
}

/// The navigation payload a successful submission yields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    /// Opaque identifier of the stored report.
    pub report_id: String,
    /// The raw result document, exactly as the service returned it.
    pub document: Value,
}

impl SubmissionReceipt {
    /// Hand the raw document to the normalizer (fresh-submission shape).
    pub fn into_source(self) -> ScheduleSource {
        ScheduleSource::from_document(self.document)
    }
}

/// Orchestrates packaging and the single in-flight submission request.
#[derive(Clone)]
pub struct SubmissionGate {
    backend: Arc<dyn ScheduleBackend>,
    config: SubmitConfig,
    in_flight: Arc<Mutex<()>>,
}

impl SubmissionGate {
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            backend,
            config: SubmitConfig::default(),
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Override the submission configuration.
    pub fn with_config(mut self, config: SubmitConfig) -> Self {
        self.config = config;
        self
    }

    /// Package the record and submit it.
    ///
    /// The login identity's phone overwrites the record's
    /// `personal_info.phone` on the transmitted copy; the stored record is
    /// not modified, so failures never cost the user any entered data.
    pub async fn submit(
        &self,
        wizard: &WizardState,
        identity: &UserIdentity,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(SubmitError::InFlight);
        };

        let mut record = wizard.record().await;
        if !identity.phone.trim().is_empty() {
            record
                .personal_info
                .get_or_insert_with(Default::default)
                .phone = identity.phone.clone();
        }

        let outcome = timeout(
            self.config.request_timeout,
            self.backend.generate_schedule(&record),
        )
        .await;

        let document = match outcome {
            Err(_) => {
                warn!("schedule generation timed out");
                return Err(SubmitError::ServiceUnavailable);
            }
            Ok(Err(BackendError::Timeout)) => {
                warn!("schedule generation timed out at the transport");
                return Err(SubmitError::ServiceUnavailable);
            }
            Ok(Err(err)) => {
                warn!(error = %err, "schedule generation failed");
                return Err(SubmitError::SubmissionFailed(err.to_string()));
            }
            Ok(Ok(document)) => document,
        };

        let success = document
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            warn!("service reported an unsuccessful schedule generation");
            return Err(SubmitError::SubmissionFailed(
                "service reported failure".to_string(),
            ));
        }

        let report_id = document
            .get("report_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        info!(report_id = %report_id, "schedule generated");
        Ok(SubmissionReceipt {
            report_id,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockFailure};
    use crate::record::{PersonalPatch, SectionPatch};
    use crate::wizard::WizardStep;
    use reporting::normalize;
    use serde_json::json;

    async fn wizard_with_phone(phone: &str) -> WizardState {
        let wizard = WizardState::new();
        wizard
            .merge_section(SectionPatch::Personal(PersonalPatch {
                farmer_name: Some("Asha".into()),
                phone: Some(phone.into()),
                ..Default::default()
            }))
            .await;
        wizard
    }

    #[tokio::test]
    async fn test_successful_submission_yields_receipt() {
        let backend = Arc::new(MockBackend::default());
        let gate = SubmissionGate::new(backend.clone());
        let wizard = wizard_with_phone("1111").await;

        let receipt = gate
            .submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap();
        assert!(!receipt.report_id.is_empty());

        // The raw document normalizes like any fresh submission.
        let result = normalize(&receipt.into_source());
        assert_eq!(result.days.len(), 7);
    }

    #[tokio::test]
    async fn test_login_phone_overrides_entered_phone() {
        let backend = Arc::new(MockBackend::default());
        let gate = SubmissionGate::new(backend.clone());
        let wizard = wizard_with_phone("1111").await;

        gate.submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap();

        let sent = backend.last_submission().unwrap();
        assert_eq!(sent.personal_info.unwrap().phone, "9999");
        // The stored record keeps what the user typed.
        assert_eq!(wizard.record().await.personal_info.unwrap().phone, "1111");
    }

    #[tokio::test]
    async fn test_blank_login_phone_keeps_entered_phone() {
        let backend = Arc::new(MockBackend::default());
        let gate = SubmissionGate::new(backend.clone());
        let wizard = wizard_with_phone("1111").await;

        gate.submit(&wizard, &UserIdentity::new("Asha", ""))
            .await
            .unwrap();
        assert_eq!(backend.last_submission().unwrap().personal_info.unwrap().phone, "1111");
    }

    #[tokio::test]
    async fn test_transport_timeout_maps_to_service_unavailable() {
        let backend =
            Arc::new(MockBackend::default().with_schedule_failure(MockFailure::Timeout));
        let gate = SubmissionGate::new(backend);
        let wizard = wizard_with_phone("1111").await;

        let err = gate
            .submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn test_outer_deadline_maps_to_service_unavailable() {
        let backend =
            Arc::new(MockBackend::default().with_latency(Duration::from_millis(100)));
        let gate = SubmissionGate::new(backend).with_config(SubmitConfig {
            request_timeout: Duration::from_millis(20),
        });
        let wizard = wizard_with_phone("1111").await;

        let err = gate
            .submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn test_failure_preserves_record_and_cursor() {
        let backend = Arc::new(
            MockBackend::default().with_schedule_failure(MockFailure::Request("boom".into())),
        );
        let gate = SubmissionGate::new(backend.clone());
        let wizard = wizard_with_phone("1111").await;
        let before = wizard.record().await;

        let err = gate
            .submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionFailed(_)));
        assert_eq!(wizard.record().await, before);
        assert_eq!(wizard.step().await, WizardStep::PersonalInfo);

        // A retry transmits again without any re-entry.
        let _ = gate.submit(&wizard, &UserIdentity::new("Asha", "9999")).await;
        assert_eq!(backend.schedule_calls(), 2);
    }

    #[tokio::test]
    async fn test_unsuccessful_document_is_a_failure() {
        let backend = Arc::new(
            MockBackend::default().with_schedule_document(json!({"success": false})),
        );
        let gate = SubmissionGate::new(backend);
        let wizard = wizard_with_phone("1111").await;

        let err = gate
            .submit(&wizard, &UserIdentity::new("Asha", "9999"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionFailed(_)));
    }

    #[tokio::test]
    async fn test_rapid_double_submit_transmits_once() {
        let backend =
            Arc::new(MockBackend::default().with_latency(Duration::from_millis(50)));
        let gate = SubmissionGate::new(backend.clone());
        let wizard = wizard_with_phone("1111").await;
        let identity = UserIdentity::new("Asha", "9999");

        let (first, second) = tokio::join!(
            gate.submit(&wizard, &identity),
            gate.submit(&wizard, &identity)
        );

        // Exactly one of the two calls transmitted.
        assert_eq!(backend.schedule_calls(), 1);
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, Err(SubmitError::InFlight))));
    }
}
