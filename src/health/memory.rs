use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AuthorizationError, HealthStore, MetricType, QueryError, RawSample, SampleQuery};

/// How the user answers the consent prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Consent {
    #[default]
    Grant,
    Deny,
    /// Health data is not available on this device at all.
    Unavailable,
}

#[derive(Debug)]
pub struct MemoryHealthStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    samples: HashMap<MetricType, Vec<RawSample>>,
    consent: Consent,
    granted: BTreeSet<MetricType>,
    /// Scope sets the user has already been prompted for.
    prompted: Vec<BTreeSet<MetricType>>,
    prompt_count: usize,
    failures: HashMap<MetricType, String>,
    latency: HashMap<MetricType, Duration>,
    query_count: usize,
}

impl MemoryHealthStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    pub fn with_consent(self, consent: Consent) -> Self {
        self.lock().consent = consent;
        self
    }

    pub fn with_sample(self, sample_type: MetricType, sample: RawSample) -> Self {
        self.push_sample(sample_type, sample);
        self
    }

    /// Every query for `sample_type` fails with `reason`.
    pub fn with_failure(self, sample_type: MetricType, reason: impl Into<String>) -> Self {
        self.lock().failures.insert(sample_type, reason.into());
        self
    }

    /// Delays answers to queries for `sample_type`.
    pub fn with_latency(self, sample_type: MetricType, latency: Duration) -> Self {
        self.lock().latency.insert(sample_type, latency);
        self
    }

    pub fn push_sample(&self, sample_type: MetricType, sample: RawSample) {
        self.lock()
            .samples
            .entry(sample_type)
            .or_default()
            .push(sample);
    }

    pub fn clear_samples(&self) {
        self.lock().samples.clear();
    }

    /// Number of consent prompts shown so far.
    pub fn prompt_count(&self) -> usize {
        self.lock().prompt_count
    }

    pub fn query_count(&self) -> usize {
        self.lock().query_count
    }

    pub fn is_granted(&self, sample_type: MetricType) -> bool {
        self.lock().granted.contains(&sample_type)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MemoryHealthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryHealthStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl HealthStore for MemoryHealthStore {
    async fn request_access(&self, read: &[MetricType]) -> Result<(), AuthorizationError> {
        let mut state = self.lock();
        if state.consent == Consent::Unavailable {
            return Err(AuthorizationError::Unavailable(
                "health data is not available on this device".into(),
            ));
        }

        let scopes: BTreeSet<MetricType> = read.iter().copied().collect();
        if !state.prompted.contains(&scopes) {
            state.prompt_count += 1;
            state.prompted.push(scopes.clone());
            if state.consent == Consent::Grant {
                state.granted.extend(scopes);
            }
        }

        match state.consent {
            Consent::Grant => Ok(()),
            _ => Err(AuthorizationError::Denied),
        }
    }

    async fn query(&self, query: SampleQuery) -> Result<Vec<RawSample>, QueryError> {
        let latency = {
            let mut state = self.lock();
            state.query_count += 1;
            state.latency.get(&query.sample_type).copied()
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let state = self.lock();
        if !state.granted.contains(&query.sample_type) {
            return Err(QueryError::NotAuthorized(query.sample_type));
        }
        if let Some(reason) = state.failures.get(&query.sample_type) {
            return Err(QueryError::Failed {
                sample_type: query.sample_type,
                reason: reason.clone(),
            });
        }

        let mut matches: Vec<RawSample> = state
            .samples
            .get(&query.sample_type)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|sample| query.window.contains(sample.end()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if query.descending {
            matches.sort_by(|a, b| b.end().cmp(&a.end()));
        } else {
            matches.sort_by(|a, b| a.end().cmp(&b.end()));
        }
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::TimeWindow;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn steps_at(value: f64, hours_ago: i64) -> RawSample {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let end = now - ChronoDuration::hours(hours_ago);
        RawSample::Quantity {
            value,
            unit: crate::health::Unit::Count,
            start: end - ChronoDuration::minutes(10),
            end,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::trailing(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(), 7)
    }

    #[tokio::test]
    async fn prompts_once_per_scope_set() {
        let store = MemoryHealthStore::new();
        store.request_access(&MetricType::ALL).await.unwrap();
        store.request_access(&MetricType::ALL).await.unwrap();
        assert_eq!(store.prompt_count(), 1);
        assert!(store.is_granted(MetricType::SleepDuration));
    }

    #[tokio::test]
    async fn denial_is_sticky_and_not_reprompted() {
        let store = MemoryHealthStore::new().with_consent(Consent::Deny);
        assert_eq!(
            store.request_access(&MetricType::ALL).await,
            Err(AuthorizationError::Denied)
        );
        assert_eq!(
            store.request_access(&MetricType::ALL).await,
            Err(AuthorizationError::Denied)
        );
        assert_eq!(store.prompt_count(), 1);
    }

    #[tokio::test]
    async fn query_without_grant_is_not_authorized() {
        let store = MemoryHealthStore::new().with_sample(MetricType::StepCount, steps_at(10.0, 1));
        let err = store
            .query(SampleQuery::latest(MetricType::StepCount, window()))
            .await
            .unwrap_err();
        assert_eq!(err, QueryError::NotAuthorized(MetricType::StepCount));
    }

    #[tokio::test]
    async fn latest_query_returns_newest_inside_window() {
        let store = MemoryHealthStore::new()
            .with_sample(MetricType::StepCount, steps_at(100.0, 30))
            .with_sample(MetricType::StepCount, steps_at(200.0, 2))
            .with_sample(MetricType::StepCount, steps_at(300.0, 24 * 8));
        store.request_access(&MetricType::ALL).await.unwrap();

        let samples = store
            .query(SampleQuery::latest(MetricType::StepCount, window()))
            .await
            .unwrap();
        assert_eq!(samples, vec![steps_at(200.0, 2)]);
    }

    #[tokio::test]
    async fn samples_outside_window_are_excluded() {
        let store =
            MemoryHealthStore::new().with_sample(MetricType::StepCount, steps_at(300.0, 24 * 8));
        store.request_access(&MetricType::ALL).await.unwrap();

        let samples = store
            .query(SampleQuery::latest(MetricType::StepCount, window()))
            .await
            .unwrap();
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn window_bounds_are_inclusive() {
        let window = window();
        let second = ChronoDuration::seconds(1);
        let ending = |value: f64, end| RawSample::Quantity {
            value,
            unit: crate::health::Unit::Count,
            start: end,
            end,
        };
        let store = MemoryHealthStore::new()
            .with_sample(MetricType::StepCount, ending(1.0, window.start - second))
            .with_sample(MetricType::StepCount, ending(2.0, window.start))
            .with_sample(MetricType::StepCount, ending(3.0, window.end))
            .with_sample(MetricType::StepCount, ending(4.0, window.end + second));
        store.request_access(&MetricType::ALL).await.unwrap();

        let samples = store
            .query(SampleQuery {
                sample_type: MetricType::StepCount,
                window,
                descending: false,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(
            samples,
            vec![ending(2.0, window.start), ending(3.0, window.end)]
        );

        let latest = store
            .query(SampleQuery::latest(MetricType::StepCount, window))
            .await
            .unwrap();
        assert_eq!(latest, vec![ending(3.0, window.end)]);
    }
}
