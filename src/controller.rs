use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};

use crate::{
    auth::AuthorizationGateway,
    health::{AuthorizationError, HealthStore},
    metrics::{MetricFetcher, MetricSnapshot, DEFAULT_LOOKBACK_DAYS},
    snapshot::SnapshotStore,
    upload::{UploadClient, UploadError},
};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Entry point for the shell: authorize, fetch, send, and observe the latest
/// snapshot.
pub struct HealthDataController<S> {
    gateway: Arc<AuthorizationGateway<S>>,
    fetcher: Arc<MetricFetcher<S>>,
    snapshots: SnapshotStore,
    uploader: UploadClient,
    /// Held for the duration of a fetch cycle so cycles publish in call order.
    fetch_guard: Arc<Mutex<()>>,
}

impl<S: HealthStore> HealthDataController<S> {
    pub fn new(store: Arc<S>, uploader: UploadClient) -> Self {
        Self::with_lookback_days(store, uploader, DEFAULT_LOOKBACK_DAYS)
    }

    pub fn with_lookback_days(store: Arc<S>, uploader: UploadClient, lookback_days: i64) -> Self {
        Self {
            gateway: Arc::new(AuthorizationGateway::new(Arc::clone(&store))),
            fetcher: Arc::new(MetricFetcher::new(store).with_lookback_days(lookback_days)),
            snapshots: SnapshotStore::new(),
            uploader,
            fetch_guard: Arc::new(Mutex::new(())),
        }
    }

    pub async fn request_authorization(&self) -> Result<(), AuthorizationError> {
        self.gateway.request_authorization().await
    }

    /// Runs a fetch cycle and publishes its result, replacing the previous
    /// snapshot. A call made while another cycle is running waits for it.
    pub async fn load_latest_metrics(&self) -> Arc<MetricSnapshot> {
        self.load_latest_metrics_at(Utc::now()).await
    }

    pub async fn load_latest_metrics_at(&self, now: DateTime<Utc>) -> Arc<MetricSnapshot> {
        let _cycle = self.fetch_guard.lock().await;

        let snapshot = self.fetcher.fetch_latest_at(now).await;
        self.snapshots.replace(snapshot);

        let published = self.snapshots.current();
        log_info!("published snapshot with {} metrics", published.len());
        published
    }

    /// Uploads the current snapshot. The token is used for this call only.
    pub async fn send_metrics(&self, token: &str) -> Result<(), UploadError> {
        let snapshot = self.snapshots.current();
        self.uploader.upload(&snapshot, token).await
    }

    pub fn metrics(&self) -> Arc<MetricSnapshot> {
        self.snapshots.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricSnapshot>> {
        self.snapshots.subscribe()
    }
}

impl<S> Clone for HealthDataController<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            fetcher: Arc::clone(&self.fetcher),
            snapshots: self.snapshots.clone(),
            uploader: self.uploader.clone(),
            fetch_guard: Arc::clone(&self.fetch_guard),
        }
    }
}
