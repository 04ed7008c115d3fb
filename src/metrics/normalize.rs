use crate::health::{MetricType, RawSample, Unit};

use super::types::NormalizedMetric;

/// Converts a raw sample into its published `(key, value)` pair.
///
/// Returns `None` when the sample cannot be expressed for `metric`: wrong
/// sample kind, a unit that does not convert to the metric's canonical unit,
/// a non-finite value, or a sleep interval that ends before it starts.
///
/// | metric | key | value |
/// |---|---|---|
/// | steps | `steps` | integer, truncated |
/// | resting heart rate | `heart_rate_resting` | nearest integer, ties to even, + `" bpm"` |
/// | sleep | `sleep_duration_minutes` | whole minutes, truncated |
pub fn normalize(metric: MetricType, sample: &RawSample) -> Option<NormalizedMetric> {
    let value = match (metric, sample) {
        (MetricType::StepCount, RawSample::Quantity { value, unit, .. }) => {
            let steps = canonical_value(metric, *value, *unit)?;
            format!("{}", steps.trunc() as i64)
        }
        (MetricType::RestingHeartRate, RawSample::Quantity { value, unit, .. }) => {
            let bpm = canonical_value(metric, *value, *unit)?;
            format!("{} bpm", whole(bpm))
        }
        (MetricType::SleepDuration, RawSample::Interval { start, end }) => {
            let seconds = (*end - *start).num_seconds();
            if seconds < 0 {
                return None;
            }
            format!("{}", seconds / 60)
        }
        _ => return None,
    };

    Some(NormalizedMetric {
        key: metric.key(),
        value,
    })
}

/// `%.0f`-style rendering: ties go to the even neighbour and `-0` prints as `0`.
fn whole(value: f64) -> String {
    let text = format!("{value:.0}");
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn canonical_value(metric: MetricType, value: f64, unit: Unit) -> Option<f64> {
    let target = metric.canonical_unit()?;
    unit.convert(value, target).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 7, 0, 0).unwrap()
    }

    fn quantity(value: f64, unit: Unit) -> RawSample {
        RawSample::Quantity {
            value,
            unit,
            start: at(),
            end: at(),
        }
    }

    fn interval(seconds: i64) -> RawSample {
        RawSample::Interval {
            start: at(),
            end: at() + Duration::seconds(seconds),
        }
    }

    fn value_of(metric: MetricType, sample: &RawSample) -> Option<String> {
        normalize(metric, sample).map(|m| m.value)
    }

    #[test]
    fn steps_are_integer_without_suffix() {
        let metric = normalize(MetricType::StepCount, &quantity(8421.0, Unit::Count)).unwrap();
        assert_eq!(metric.key, "steps");
        assert_eq!(metric.value, "8421");
        assert_eq!(
            value_of(MetricType::StepCount, &quantity(999.9, Unit::Count)).as_deref(),
            Some("999")
        );
    }

    #[test]
    fn resting_heart_rate_rounds_to_nearest() {
        assert_eq!(
            value_of(MetricType::RestingHeartRate, &quantity(57.5, Unit::CountPerMinute)).as_deref(),
            Some("58 bpm")
        );
        assert_eq!(
            value_of(MetricType::RestingHeartRate, &quantity(57.51, Unit::CountPerMinute)).as_deref(),
            Some("58 bpm")
        );
        assert_eq!(
            value_of(MetricType::RestingHeartRate, &quantity(57.49, Unit::CountPerMinute)).as_deref(),
            Some("57 bpm")
        );
        let metric =
            normalize(MetricType::RestingHeartRate, &quantity(1.0, Unit::CountPerSecond)).unwrap();
        assert_eq!(metric.key, "heart_rate_resting");
        assert_eq!(metric.value, "60 bpm");
    }

    #[test]
    fn resting_heart_rate_ties_go_to_even() {
        for (bpm, expected) in [(58.5, "58 bpm"), (59.5, "60 bpm"), (60.5, "60 bpm"), (0.5, "0 bpm")] {
            assert_eq!(
                value_of(MetricType::RestingHeartRate, &quantity(bpm, Unit::CountPerMinute)).as_deref(),
                Some(expected),
                "{bpm}"
            );
        }
    }

    #[test]
    fn negative_zero_heart_rate_prints_as_zero() {
        assert_eq!(
            value_of(MetricType::RestingHeartRate, &quantity(-0.2, Unit::CountPerMinute)).as_deref(),
            Some("0 bpm")
        );
    }

    #[test]
    fn sleep_minutes_are_truncated() {
        let metric = normalize(MetricType::SleepDuration, &interval(7 * 3600 + 59)).unwrap();
        assert_eq!(metric.key, "sleep_duration_minutes");
        assert_eq!(metric.value, "420");
        assert_eq!(value_of(MetricType::SleepDuration, &interval(119)).as_deref(), Some("1"));
    }

    #[test]
    fn mismatched_samples_are_unresolvable() {
        assert_eq!(value_of(MetricType::SleepDuration, &quantity(5.0, Unit::Count)), None);
        assert_eq!(value_of(MetricType::StepCount, &interval(60)), None);
        assert_eq!(
            value_of(MetricType::RestingHeartRate, &quantity(60.0, Unit::Count)),
            None
        );
        assert_eq!(value_of(MetricType::SleepDuration, &interval(-60)), None);
        assert_eq!(
            value_of(MetricType::StepCount, &quantity(f64::NAN, Unit::Count)),
            None
        );
    }

    #[test]
    fn normalization_is_deterministic() {
        let sample = quantity(61.7, Unit::CountPerMinute);
        let first = normalize(MetricType::RestingHeartRate, &sample);
        for _ in 0..10 {
            assert_eq!(normalize(MetricType::RestingHeartRate, &sample), first);
        }
    }
}
