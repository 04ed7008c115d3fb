mod normalize;
mod types;

pub use normalize::normalize;
pub use types::{MetricSnapshot, NormalizedMetric};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::health::{HealthStore, MetricType, SampleQuery, TimeWindow};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Reads the most recent sample of every tracked metric.
pub struct MetricFetcher<S> {
    store: Arc<S>,
    lookback_days: i64,
}

impl<S: HealthStore> MetricFetcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Runs one fetch cycle over the trailing window ending now.
    pub async fn fetch_latest(&self) -> MetricSnapshot {
        self.fetch_latest_at(Utc::now()).await
    }

    /// Runs one fetch cycle over the trailing window ending at `now`.
    ///
    /// The three queries run concurrently and the snapshot is assembled only
    /// once all of them have settled. A metric whose query fails or finds
    /// nothing is left out; the cycle itself never fails.
    pub async fn fetch_latest_at(&self, now: DateTime<Utc>) -> MetricSnapshot {
        let window = TimeWindow::trailing(now, self.lookback_days);

        let (steps, resting, sleep) = tokio::join!(
            self.latest(MetricType::StepCount, window),
            self.latest(MetricType::RestingHeartRate, window),
            self.latest(MetricType::SleepDuration, window),
        );

        let snapshot: MetricSnapshot = [steps, resting, sleep]
            .into_iter()
            .flatten()
            .map(|metric| (metric.key, metric.value))
            .collect();

        log_info!(
            "fetch cycle resolved {}/{} metrics",
            snapshot.len(),
            MetricType::ALL.len()
        );
        snapshot
    }

    async fn latest(&self, metric: MetricType, window: TimeWindow) -> Option<NormalizedMetric> {
        let samples = match self.store.query(SampleQuery::latest(metric, window)).await {
            Ok(samples) => samples,
            Err(err) => {
                log_warn!("{metric} omitted: {err}");
                return None;
            }
        };

        let Some(sample) = samples.first() else {
            log_debug!("{metric} omitted: no samples in the last {} days", self.lookback_days);
            return None;
        };

        let normalized = normalize(metric, sample);
        if normalized.is_none() {
            log_debug!("{metric} omitted: sample could not be normalized");
        }
        normalized
    }
}
