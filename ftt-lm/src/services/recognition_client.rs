//! Label recognition service client
//!
//! Uploads a raw camera frame and returns the labels the service read from it.
//!
//! Response body is a JSON array:
//!
//! ```json
//! [{"label_id": "…", "parsed_data": {"product_name": "…", "batch_no": "…",
//!   "employee_name": "…", "label_type": "…", "dates": ["dd/mm/yy HH:MM", …]}}]
//! ```
//!
//! A malformed array element is skipped, as is a non-string entry inside
//! `dates`; the rest of the response is still used. No retry is attempted:
//! the next capture tick is the retry.

use crate::models::ParsedLabel;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Production recognition endpoint
pub const DEFAULT_RECOGNITION_URL: &str = "https://ftt-api.onrender.com/";

/// Request timeout for one recognition call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const PROCESS_IMAGE_PATH: &str = "process-image";
const USER_AGENT: &str = concat!("ftt-lm/", env!("CARGO_PKG_VERSION"));

/// Recognition client errors
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Recognition request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecognitionError::Timeout
        } else {
            RecognitionError::Network(e.to_string())
        }
    }
}

/// Something that turns an image into candidate labels
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Submit one frame for recognition
    async fn submit(&self, image: Vec<u8>) -> Result<Vec<ParsedLabel>, RecognitionError>;

    /// Open a connection ahead of the first capture
    async fn warm_up(&self) -> Result<(), RecognitionError> {
        Ok(())
    }
}

/// HTTP client for the recognition service
pub struct RecognitionClient {
    http_client: reqwest::Client,
    base_url: String,
    endpoint: String,
}

impl RecognitionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let trimmed = base_url.trim_end_matches('/');
        Ok(Self {
            http_client,
            base_url: format!("{}/", trimmed),
            endpoint: format!("{}/{}", trimmed, PROCESS_IMAGE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Recognizer for RecognitionClient {
    async fn submit(&self, image: Vec<u8>) -> Result<Vec<ParsedLabel>, RecognitionError> {
        debug!(bytes = image.len(), endpoint = %self.endpoint, "Submitting frame for recognition");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Api(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        let labels = parse_recognition_body(&body)?;

        debug!(labels = labels.len(), "Recognition call succeeded");
        Ok(labels)
    }

    async fn warm_up(&self) -> Result<(), RecognitionError> {
        let response = self.http_client.get(&self.base_url).send().await?;
        debug!(status = response.status().as_u16(), "Recognition service reachable");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct WireLabel {
    label_id: String,
    parsed_data: WireParsedData,
}

#[derive(Debug, Deserialize)]
struct WireParsedData {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    batch_no: Option<String>,
    #[serde(default)]
    employee_name: Option<String>,
    #[serde(default)]
    label_type: Option<String>,
    #[serde(default)]
    dates: Option<Vec<serde_json::Value>>,
}

impl From<WireLabel> for ParsedLabel {
    fn from(wire: WireLabel) -> Self {
        let data = wire.parsed_data;
        let dates = data
            .dates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(date) => Some(date),
                other => {
                    warn!(value = %other, "Skipping non-string date");
                    None
                }
            })
            .collect();

        ParsedLabel {
            label_id: wire.label_id,
            product_name: data.product_name.unwrap_or_default(),
            batch_no: data.batch_no.unwrap_or_default(),
            employee_name: data.employee_name.unwrap_or_default(),
            label_type: data.label_type.unwrap_or_default(),
            dates,
        }
    }
}

/// Parse a recognition response body
///
/// Fails only when the body is not a JSON array; malformed elements are
/// skipped.
pub fn parse_recognition_body(body: &str) -> Result<Vec<ParsedLabel>, RecognitionError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| RecognitionError::Parse(e.to_string()))?;

    let labels = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<WireLabel>(item) {
            Ok(wire) => Some(ParsedLabel::from(wire)),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed label in recognition response");
                None
            }
        })
        .collect();

    Ok(labels)
}
