//! Shell-facing commands. Each returns the status line the shell shows, with
//! failures flattened to strings the same way for every command.

use crate::{controller::HealthDataController, health::HealthStore, upload::UploadError};

pub async fn request_health_access<S: HealthStore>(
    controller: &HealthDataController<S>,
) -> Result<String, String> {
    controller
        .request_authorization()
        .await
        .map(|()| "Authorization granted".to_string())
        .map_err(|e| format!("Authorization failed: {e}"))
}

/// Fetches and returns the published metrics sorted by key.
pub async fn fetch_metrics<S: HealthStore>(
    controller: &HealthDataController<S>,
) -> Vec<(String, String)> {
    controller
        .load_latest_metrics()
        .await
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub async fn send_to_api<S: HealthStore>(
    controller: &HealthDataController<S>,
    token: &str,
) -> Result<String, String> {
    controller
        .send_metrics(token)
        .await
        .map(|()| "Metrics sent".to_string())
        .map_err(|e| match e {
            UploadError::MissingToken => e.to_string(),
            other => format!("Send failed: {other}"),
        })
}

pub fn render_metrics(metrics: &[(String, String)]) -> String {
    let mut out = String::from("=== Health Bridge ===\n");
    if metrics.is_empty() {
        out.push_str("No recent metrics\n");
    }
    for (key, value) in metrics {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out
}
