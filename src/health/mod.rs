//! Access to the on-device health data store.
//!
//! The platform store is reached through [`HealthStore`]. [`MemoryHealthStore`]
//! is the in-process implementation; [`export`] fills one from a JSON export of
//! the device's samples.

pub mod export;
mod memory;
mod types;

pub use memory::{Consent, MemoryHealthStore};
pub use types::{MetricType, RawSample, SampleKind, SampleQuery, TimeWindow, Unit};

use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("health data access was denied")]
    Denied,
    #[error("health data is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("not authorized to read {0}")]
    NotAuthorized(MetricType),
    #[error("query for {sample_type} failed: {reason}")]
    Failed {
        sample_type: MetricType,
        reason: String,
    },
}

/// Protected health data store.
///
/// Access must be granted per read scope before queries for that scope
/// succeed. `request_access` must be safe to call repeatedly: the consent
/// prompt is shown at most once per scope set.
pub trait HealthStore: Send + Sync + 'static {
    fn request_access(
        &self,
        read: &[MetricType],
    ) -> impl Future<Output = Result<(), AuthorizationError>> + Send;

    fn query(
        &self,
        query: SampleQuery,
    ) -> impl Future<Output = Result<Vec<RawSample>, QueryError>> + Send;
}
