use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked health metric. Also used as the sample type and the read scope
/// requested from the health store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    StepCount,
    RestingHeartRate,
    #[serde(rename = "sleep_analysis")]
    SleepDuration,
}

impl MetricType {
    pub const ALL: [MetricType; 3] = [
        MetricType::StepCount,
        MetricType::RestingHeartRate,
        MetricType::SleepDuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::StepCount => "step_count",
            MetricType::RestingHeartRate => "resting_heart_rate",
            MetricType::SleepDuration => "sleep_analysis",
        }
    }

    /// Key under which the normalized value is published and uploaded.
    pub fn key(&self) -> &'static str {
        match self {
            MetricType::StepCount => "steps",
            MetricType::RestingHeartRate => "heart_rate_resting",
            MetricType::SleepDuration => "sleep_duration_minutes",
        }
    }

    pub fn sample_kind(&self) -> SampleKind {
        match self {
            MetricType::StepCount | MetricType::RestingHeartRate => SampleKind::Quantity,
            MetricType::SleepDuration => SampleKind::Category,
        }
    }

    /// Unit quantity values are converted to before normalization. Category
    /// metrics carry no unit.
    pub fn canonical_unit(&self) -> Option<Unit> {
        match self {
            MetricType::StepCount => Some(Unit::Count),
            MetricType::RestingHeartRate => Some(Unit::CountPerMinute),
            MetricType::SleepDuration => None,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Cumulative or discrete quantity (steps, beats per minute).
    Quantity,
    /// Interval-only record (sleep analysis).
    Category,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Count,
    #[serde(rename = "count/min")]
    CountPerMinute,
    #[serde(rename = "count/s")]
    CountPerSecond,
}

impl Unit {
    /// Converts `value` expressed in `self` into `target`. Returns `None` for
    /// incompatible units (a plain count is not a rate).
    pub fn convert(self, value: f64, target: Unit) -> Option<f64> {
        match (self, target) {
            (a, b) if a == b => Some(value),
            (Unit::CountPerSecond, Unit::CountPerMinute) => Some(value * 60.0),
            (Unit::CountPerMinute, Unit::CountPerSecond) => Some(value / 60.0),
            _ => None,
        }
    }
}

/// One record returned by a health store query.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSample {
    Quantity {
        value: f64,
        unit: Unit,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Interval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl RawSample {
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            RawSample::Quantity { start, .. } | RawSample::Interval { start, .. } => *start,
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        match self {
            RawSample::Quantity { end, .. } | RawSample::Interval { end, .. } => *end,
        }
    }

    pub fn kind(&self) -> SampleKind {
        match self {
            RawSample::Quantity { .. } => SampleKind::Quantity,
            RawSample::Interval { .. } => SampleKind::Category,
        }
    }
}

/// Inclusive range of sample end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `[now - days, now]`. A span reaching past the earliest representable
    /// instant starts there instead.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        let start = Duration::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleQuery {
    pub sample_type: MetricType,
    pub window: TimeWindow,
    /// Sort by end time, newest first.
    pub descending: bool,
    pub limit: Option<usize>,
}

impl SampleQuery {
    /// The single most recently ended sample of `sample_type` inside `window`.
    pub fn latest(sample_type: MetricType, window: TimeWindow) -> Self {
        Self {
            sample_type,
            window,
            descending: true,
            limit: Some(1),
        }
    }
}
