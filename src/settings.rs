use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path, path::PathBuf, time::Duration};

use crate::{
    metrics::DEFAULT_LOOKBACK_DAYS,
    upload::{UploadConfig, DEFAULT_ENDPOINT},
};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// JSON export of device samples, relative to the config file.
    pub export_path: PathBuf,
    pub lookback_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout_secs: 30,
            export_path: PathBuf::from("health_export.json"),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(anyhow!(
                    "Config file '{}' not found. Create it from config.example.json and retry.",
                    path.display()
                ));
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read config from {}", path.display()))
            }
        };

        let mut settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in config file '{}'", path.display()))?;

        if settings.export_path.is_relative() {
            if let Some(dir) = path.parent() {
                settings.export_path = dir.join(&settings.export_path);
            }
        }
        if settings.lookback_days <= 0 {
            return Err(anyhow!(
                "lookback_days must be positive in '{}'",
                path.display()
            ));
        }

        Ok(settings)
    }

    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
