use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::metrics::MetricSnapshot;

use super::UploadError;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const DEFAULT_ENDPOINT: &str = "https://YOUR_API_BASE_URL/health-metrics";

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Full URL the snapshot is POSTed to.
    pub endpoint: String,
    /// Whole-request timeout, connect included.
    pub timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Single-shot authenticated POST of a snapshot. No retries.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UploadError::Transport)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Uploads `snapshot` with `token` as bearer credential.
    ///
    /// An empty snapshot or a blank token fails before any request is made.
    /// Any 2xx status is success; the response body is ignored.
    pub async fn upload(&self, snapshot: &MetricSnapshot, token: &str) -> Result<(), UploadError> {
        if snapshot.is_empty() {
            return Err(UploadError::EmptyInput);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(UploadError::MissingToken);
        }

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(encode_body(snapshot))
            .send()
            .await
            .map_err(|err| {
                log_warn!("upload to {} failed: {err}", self.endpoint);
                UploadError::Transport(err)
            })?;

        let status = response.status();
        if status.is_success() {
            log_info!("uploaded {} metrics ({status})", snapshot.len());
            Ok(())
        } else {
            log_warn!("upload rejected by {} ({status})", self.endpoint);
            Err(UploadError::ServerRejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Request body: a flat JSON object of metric key to display string.
pub fn encode_body(snapshot: &MetricSnapshot) -> String {
    let object: Map<String, Value> = snapshot
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();
    Value::Object(object).to_string()
}
