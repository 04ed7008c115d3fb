//! Loads a [`MemoryHealthStore`] from a JSON export of device samples.
//!
//! ```json
//! {
//!   "consent": "grant",
//!   "samples": [
//!     { "type": "step_count", "value": 8421, "unit": "count",
//!       "start": "2024-05-10T08:00:00Z", "end": "2024-05-10T09:00:00Z" },
//!     { "type": "sleep_analysis",
//!       "start": "2024-05-09T23:10:00Z", "end": "2024-05-10T06:40:00Z" }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Consent, MemoryHealthStore, MetricType, RawSample, SampleKind, Unit};

#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(default)]
    consent: Consent,
    #[serde(default)]
    samples: Vec<ExportedSample>,
}

#[derive(Debug, Deserialize)]
struct ExportedSample {
    #[serde(rename = "type")]
    sample_type: MetricType,
    value: Option<f64>,
    unit: Option<Unit>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ExportedSample {
    fn into_raw(self) -> Result<RawSample> {
        match self.sample_type.sample_kind() {
            SampleKind::Quantity => {
                let Some(value) = self.value else {
                    bail!("{} sample ending {} has no value", self.sample_type, self.end);
                };
                let unit = self
                    .unit
                    .or(self.sample_type.canonical_unit())
                    .unwrap_or(Unit::Count);
                Ok(RawSample::Quantity {
                    value,
                    unit,
                    start: self.start,
                    end: self.end,
                })
            }
            SampleKind::Category => Ok(RawSample::Interval {
                start: self.start,
                end: self.end,
            }),
        }
    }
}

pub fn parse_export(contents: &str) -> Result<MemoryHealthStore> {
    let export: ExportFile =
        serde_json::from_str(contents).context("health export is not valid JSON")?;

    let store = MemoryHealthStore::new().with_consent(export.consent);
    for (index, sample) in export.samples.into_iter().enumerate() {
        let sample_type = sample.sample_type;
        let raw = sample
            .into_raw()
            .with_context(|| format!("invalid sample at index {index}"))?;
        store.push_sample(sample_type, raw);
    }
    Ok(store)
}

pub fn load_export(path: &Path) -> Result<MemoryHealthStore> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read health export from {}", path.display()))?;
    parse_export(&contents).with_context(|| format!("Failed to load {}", path.display()))
}
