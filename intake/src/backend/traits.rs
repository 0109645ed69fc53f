//! Core trait for recommendation-service backends.
//!
//! This module defines [`ScheduleBackend`] - the abstraction over the
//! remote service that classifies soil photos, generates irrigation
//! schedules, and stores report history.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::record::AggregateRecord;
use reporting::StoredReport;

/// Error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Backend is not reachable or not healthy
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Request failed (non-success status or service-reported error)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The request ran out of time
    #[error("Request timed out")]
    Timeout,

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Parsing error
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl BackendError {
    /// True for the timeout class of failures (the cold-start case).
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout)
    }
}

/// Receiver side of the upload-progress channel (percent, 0-100).
pub type ProgressReceiver = watch::Receiver<u8>;
/// Sender side of the upload-progress channel.
pub type ProgressSender = watch::Sender<u8>;

/// Content types the classification endpoint accepts.
const SUPPORTED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
];

/// A soil photo queued for classification.
#[derive(Debug, Clone)]
pub struct SoilImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SoilImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the content type is one the service accepts.
    pub fn is_supported_type(&self) -> bool {
        SUPPORTED_IMAGE_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(self.content_type.trim()))
    }
}

/// Soil properties as reported alongside a classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedSoilProperties {
    #[serde(default)]
    pub water_holding_capacity: String,
    #[serde(default)]
    pub infiltration_rate: String,
    #[serde(default)]
    pub field_capacity: f64,
    #[serde(default)]
    pub description: String,
}

/// Result of one classification attempt. Ephemeral: discarded on retry,
/// superseded by manual selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilClassification {
    pub predicted_label: String,
    /// Percent confidence, 0-100
    pub confidence: f64,
    /// How the service arrived at the label (e.g. "color_analysis")
    pub method: String,
    #[serde(default)]
    pub properties: ReportedSoilProperties,
}

/// Abstraction over the remote recommendation service.
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Backend identifier (service URL or mock name).
    fn id(&self) -> &str;

    /// Cheap health probe.
    async fn is_available(&self) -> bool;

    /// Classify a soil photo. Upload progress (percent) is reported through
    /// `progress` when supplied; it is feedback only, never correctness.
    async fn classify_soil(
        &self,
        image: &SoilImage,
        progress: Option<ProgressSender>,
    ) -> Result<SoilClassification, BackendError>;

    /// Submit the completed record; returns the raw result document.
    async fn generate_schedule(&self, record: &AggregateRecord) -> Result<Value, BackendError>;

    /// Stored reports for a phone number, newest first.
    async fn fetch_history(&self, phone: &str) -> Result<Vec<StoredReport>, BackendError>;

    /// Delete one stored report.
    async fn delete_report(&self, report_id: &str) -> Result<(), BackendError>;

    /// Delete several stored reports.
    async fn delete_reports(&self, report_ids: &[String]) -> Result<(), BackendError> {
        futures::future::try_join_all(report_ids.iter().map(|id| self.delete_report(id))).await?;
        Ok(())
    }

    /// Server-side history retention, in days (0 = never expire).
    async fn retention_days(&self) -> Result<u32, BackendError>;

    /// Update the retention setting; returns the stored value.
    async fn set_retention_days(&self, days: u32) -> Result<u32, BackendError>;
}
