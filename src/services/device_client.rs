use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error as ThisError;

use crate::config::device::DeviceSettings;
use crate::error::AppError;
use crate::models::health_data::DeviceMetrics;

#[derive(Debug, ThisError)]
pub enum TelemetryError {
    #[error("device service timed out")]
    Timeout,
    #[error("device service unavailable: {0}")]
    Unavailable(String),
    #[error("device data failed validation: {0}")]
    InvalidPayload(String),
}

impl From<TelemetryError> for AppError {
    fn from(e: TelemetryError) -> Self {
        match e {
            TelemetryError::Timeout | TelemetryError::Unavailable(_) => {
                AppError::ServiceUnavailable("Device service unavailable".to_string())
            }
            TelemetryError::InvalidPayload(detail) => {
                AppError::BadUpstreamData(format!("Device data error: {}", detail))
            }
        }
    }
}

/// Supplies one device snapshot per call.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> Result<DeviceMetrics, TelemetryError>;
}

/// Fetches the snapshot from the device summary endpoint. Each call is one
/// GET; no snapshots are buffered between requests.
#[derive(Clone)]
pub struct HttpTelemetrySource {
    client: Client,
    url: String,
    request_timeout: Duration,
}

impl HttpTelemetrySource {
    pub fn new(settings: &DeviceSettings) -> Self {
        Self {
            client: Client::new(),
            url: settings.snapshot_url(),
            request_timeout: settings.timeout(),
        }
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch(&self) -> Result<DeviceMetrics, TelemetryError> {
        tracing::debug!("Fetching device snapshot from {}", self.url);

        let response = self.client
            .get(&self.url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TelemetryError::Timeout
                } else {
                    TelemetryError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            tracing::error!("Device service returned {}", status);
            return Err(TelemetryError::Unavailable(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            tracing::error!("Device service rejected the request with {}", status);
            return Err(TelemetryError::InvalidPayload(format!("HTTP {}", status)));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TelemetryError::Timeout
            } else {
                TelemetryError::Unavailable(e.to_string())
            }
        })?;

        let metrics: DeviceMetrics = serde_json::from_slice(&body)
            .map_err(|e| TelemetryError::InvalidPayload(e.to_string()))?;
        metrics.validate().map_err(TelemetryError::InvalidPayload)?;

        tracing::info!("Device snapshot received for {}", metrics.date);
        Ok(metrics)
    }
}
