//! HTTP backend for the recommendation service.
//!
//! Speaks the service's REST surface: multipart soil classification,
//! JSON schedule generation, and the history/retention endpoints. The
//! per-request timeout defaults to three minutes because the hosted
//! service cold-starts.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::traits::*;
use crate::record::AggregateRecord;
use reporting::StoredReport;

/// Default per-request timeout (the service may be cold-starting).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Upload chunk size for progress accounting.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// HTTP client for the recommendation service.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpBackend {
    /// Create a backend against a service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn map_transport_error(err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Unavailable(err.to_string())
        } else {
            BackendError::NetworkError(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(BackendError::RequestFailed(format!(
            "HTTP {}: {}",
            status, message
        )))
    }

    /// Build the multipart image part, reporting percent uploaded through
    /// the watch channel as chunks are consumed.
    fn image_part(image: &SoilImage, progress: Option<ProgressSender>) -> Part {
        let total = image.len().max(1);
        let part = match progress {
            Some(tx) => {
                let chunks: Vec<Bytes> = image
                    .bytes
                    .chunks(UPLOAD_CHUNK_BYTES)
                    .map(Bytes::copy_from_slice)
                    .collect();
                let stream = futures::stream::iter(chunks).scan(0usize, move |sent, chunk| {
                    *sent += chunk.len();
                    let percent = ((*sent * 100) / total).min(100) as u8;
                    let _ = tx.send(percent);
                    futures::future::ready(Some(Ok::<_, std::io::Error>(chunk)))
                });
                Part::stream_with_length(reqwest::Body::wrap_stream(stream), image.len() as u64)
            }
            None => Part::bytes(image.bytes.to_vec()),
        };
        part.file_name(image.file_name.clone())
    }
}

/// Classification response envelope.
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    predicted_soil_type: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    method: String,
    #[serde(default)]
    soil_properties: ReportedSoilProperties,
    #[serde(default)]
    error: Option<String>,
}

/// History response envelope.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    reports: Vec<StoredReport>,
}

#[derive(Debug, Serialize)]
struct RetentionUpdate {
    days: u32,
}

#[derive(Debug, Deserialize)]
struct RetentionBody {
    retention_days: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[async_trait]
impl ScheduleBackend for HttpBackend {
    fn id(&self) -> &str {
        &self.base_url
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(self.api_url("soil-types"))
            .timeout(self.request_timeout)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn classify_soil(
        &self,
        image: &SoilImage,
        progress: Option<ProgressSender>,
    ) -> Result<SoilClassification, BackendError> {
        let part = Self::image_part(image, progress)
            .mime_str(&image.content_type)
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;
        let form = Form::new().part("soil_image", part);

        let response = self
            .client
            .post(self.api_url("classify-soil"))
            .timeout(self.request_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        if !body.success {
            return Err(BackendError::RequestFailed(
                body.error.unwrap_or_else(|| "classification rejected".to_string()),
            ));
        }

        debug!(
            soil = %body.predicted_soil_type,
            confidence = body.confidence,
            method = %body.method,
            "soil classified"
        );

        Ok(SoilClassification {
            predicted_label: body.predicted_soil_type,
            confidence: body.confidence,
            method: body.method,
            properties: body.soil_properties,
        })
    }

    async fn generate_schedule(&self, record: &AggregateRecord) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.api_url("generate-schedule"))
            .timeout(self.request_timeout)
            .json(record)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))
    }

    async fn fetch_history(&self, phone: &str) -> Result<Vec<StoredReport>, BackendError> {
        let response = self
            .client
            .get(self.api_url("history"))
            .timeout(self.request_timeout)
            .query(&[("phone", phone)])
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;
        Ok(body.reports)
    }

    async fn delete_report(&self, report_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.api_url(&format!("history/{}", report_id)))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn retention_days(&self) -> Result<u32, BackendError> {
        let response = self
            .client
            .get(self.api_url("retention"))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        let body: RetentionBody = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;
        Ok(body.retention_days)
    }

    async fn set_retention_days(&self, days: u32) -> Result<u32, BackendError> {
        let response = self
            .client
            .put(self.api_url("retention"))
            .timeout(self.request_timeout)
            .json(&RetentionUpdate { days })
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        let body: RetentionBody = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;
        Ok(body.retention_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let backend = HttpBackend::new("https://irrigation.example.org/");
        assert_eq!(backend.id(), "https://irrigation.example.org");
        assert_eq!(
            backend.api_url("generate-schedule"),
            "https://irrigation.example.org/api/generate-schedule"
        );
    }

    #[test]
    fn test_timeout_override() {
        let backend =
            HttpBackend::new("http://localhost:5000").with_request_timeout(Duration::from_secs(5));
        assert_eq!(backend.request_timeout, Duration::from_secs(5));
    }
}
