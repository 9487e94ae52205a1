//! Remote delivery client
//!
//! Posts one lot summary per call to the plant-data aggregation endpoint.
//! No retry lives here: a file that fails delivery is simply not ledgered,
//! and the next scheduled run re-attempts it. The remote side upserts by
//! barcode, so re-delivery overwrites rather than duplicates.

use crate::models::LotSummary;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Bounds a single request so one unreachable endpoint cannot stall the
/// batch indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivery failures
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Transport-level failure: timeout, connection refused, DNS
    #[error("Network error: {0}")]
    Transport(String),

    /// Endpoint responded with a non-success status
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
}

/// Acknowledgement from the remote store
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    message: Option<String>,
}

/// Plant-data store client
pub struct DeliveryClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl DeliveryClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Deliver one lot summary. Success is exactly HTTP 200 or 201; the
    /// response's `message` field is surfaced for logging.
    pub async fn deliver(&self, summary: &LotSummary) -> Result<DeliveryReceipt, DeliveryError> {
        tracing::debug!(barcode = %summary.barcode, "Delivering lot summary");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(summary)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 && status != 201 {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status { status, body });
        }

        let message = response
            .json::<ApiResponse>()
            .await
            .ok()
            .and_then(|r| r.message)
            .unwrap_or_default();

        tracing::info!(
            barcode = %summary.barcode,
            status = status,
            message = %message,
            "Delivery accepted"
        );

        Ok(DeliveryReceipt { status, message })
    }
}
