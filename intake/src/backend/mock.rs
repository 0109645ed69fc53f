//! Mock recommendation backend for testing.
//!
//! Configurable responses, induced failures, and injected latency for
//! exercising the wizard flows without a network.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;

use super::traits::*;
use crate::record::AggregateRecord;
use reporting::StoredReport;

/// Which failure a mock operation should produce.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Timeout,
    Unavailable,
    Request(String),
    Network(String),
}

impl MockFailure {
    fn to_error(&self) -> BackendError {
        match self {
            MockFailure::Timeout => BackendError::Timeout,
            MockFailure::Unavailable => BackendError::Unavailable("mock disabled".to_string()),
            MockFailure::Request(msg) => BackendError::RequestFailed(msg.clone()),
            MockFailure::Network(msg) => BackendError::NetworkError(msg.clone()),
        }
    }
}

/// Mock backend for testing.
pub struct MockBackend {
    id: String,
    available: AtomicBool,
    latency: Duration,
    classification: SoilClassification,
    classify_failure: Option<MockFailure>,
    schedule_document: Option<Value>,
    schedule_failure: Option<MockFailure>,
    reports: Mutex<Vec<StoredReport>>,
    retention_days: AtomicU32,
    classify_calls: AtomicU32,
    schedule_calls: AtomicU32,
    last_submission: Mutex<Option<AggregateRecord>>,
}

impl MockBackend {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available: AtomicBool::new(true),
            latency: Duration::ZERO,
            classification: SoilClassification {
                predicted_label: "Loam".to_string(),
                confidence: 70.0,
                method: "color_analysis".to_string(),
                properties: ReportedSoilProperties {
                    water_holding_capacity: "Medium".to_string(),
                    infiltration_rate: "Moderate".to_string(),
                    field_capacity: 0.25,
                    description: "Good for irrigation".to_string(),
                },
            },
            classify_failure: None,
            schedule_document: None,
            schedule_failure: None,
            reports: Mutex::new(Vec::new()),
            retention_days: AtomicU32::new(30),
            classify_calls: AtomicU32::new(0),
            schedule_calls: AtomicU32::new(0),
            last_submission: Mutex::new(None),
        }
    }

    /// Set the classification returned on success.
    pub fn with_classification(mut self, classification: SoilClassification) -> Self {
        self.classification = classification;
        self
    }

    /// Make classification fail.
    pub fn with_classify_failure(mut self, failure: MockFailure) -> Self {
        self.classify_failure = Some(failure);
        self
    }

    /// Set the raw document returned by schedule generation.
    pub fn with_schedule_document(mut self, document: Value) -> Self {
        self.schedule_document = Some(document);
        self
    }

    /// Make schedule generation fail.
    pub fn with_schedule_failure(mut self, failure: MockFailure) -> Self {
        self.schedule_failure = Some(failure);
        self
    }

    /// Delay every operation by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set availability.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Seed the stored history.
    pub fn with_reports(self, reports: Vec<StoredReport>) -> Self {
        *self.reports.lock().unwrap() = reports;
        self
    }

    /// Number of classification calls made.
    pub fn classify_calls(&self) -> u32 {
        self.classify_calls.load(Ordering::SeqCst)
    }

    /// Number of schedule-generation calls made.
    pub fn schedule_calls(&self) -> u32 {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    /// The record most recently submitted for schedule generation.
    pub fn last_submission(&self) -> Option<AggregateRecord> {
        self.last_submission.lock().unwrap().clone()
    }

    /// Remaining stored report ids.
    pub fn report_ids(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }

    /// A plausible success document for a submitted record.
    fn synthesize_document(record: &AggregateRecord) -> Value {
        let schedule: Vec<Value> = (1..=7)
            .map(|day| {
                json!({
                    "date": format!("2025-06-{:02}", day),
                    "day_name": "Sunday",
                    "irrigation_needed": day % 2 == 1,
                    "irrigation_amount_mm": if day % 2 == 1 { 12.0 } else { 0.0 },
                    "soil_moisture_percent": 55.0,
                    "weather": {"temp_max": 34.0, "temp_min": 22.0, "humidity": 40.0,
                                "rainfall": 0.0, "wind_speed": 4.0},
                    "et0": 6.1,
                    "etc": 5.4,
                    "recommendation": "Soil moisture adequate - monitor daily",
                    "prediction_method": "fao56_method",
                    "ml_confidence": 75.0
                })
            })
            .collect();

        json!({
            "success": true,
            "report_id": uuid::Uuid::new_v4().to_string(),
            "schedule": schedule,
            "summary": {
                "total_irrigation_days": 4,
                "total_water_mm": 48.0,
                "total_water_liters": 4800.0,
                "avg_daily_etc": 5.4,
                "schedule": schedule,
                "user_data": serde_json::to_value(record).unwrap_or_default()
            }
        })
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-service")
    }
}

#[async_trait]
impl ScheduleBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn classify_soil(
        &self,
        _image: &SoilImage,
        progress: Option<ProgressSender>,
    ) -> Result<SoilClassification, BackendError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("mock disabled".to_string()));
        }
        if let Some(failure) = &self.classify_failure {
            return Err(failure.to_error());
        }
        if let Some(tx) = progress {
            let _ = tx.send(100);
        }
        Ok(self.classification.clone())
    }

    async fn generate_schedule(&self, record: &AggregateRecord) -> Result<Value, BackendError> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("mock disabled".to_string()));
        }
        if let Some(failure) = &self.schedule_failure {
            return Err(failure.to_error());
        }
        *self.last_submission.lock().unwrap() = Some(record.clone());
        Ok(self
            .schedule_document
            .clone()
            .unwrap_or_else(|| Self::synthesize_document(record)))
    }

    async fn fetch_history(&self, _phone: &str) -> Result<Vec<StoredReport>, BackendError> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn delete_report(&self, report_id: &str) -> Result<(), BackendError> {
        self.reports.lock().unwrap().retain(|r| r.id != report_id);
        Ok(())
    }

    async fn retention_days(&self) -> Result<u32, BackendError> {
        Ok(self.retention_days.load(Ordering::SeqCst))
    }

    async fn set_retention_days(&self, days: u32) -> Result<u32, BackendError> {
        self.retention_days.store(days, Ordering::SeqCst);
        Ok(days)
    }
}
