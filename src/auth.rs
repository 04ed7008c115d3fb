use std::sync::Arc;

use crate::health::{AuthorizationError, HealthStore, MetricType};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Read scopes requested from the health store. Nothing is ever written.
pub const READ_SCOPES: [MetricType; 3] = MetricType::ALL;

pub struct AuthorizationGateway<S> {
    store: Arc<S>,
}

impl<S: HealthStore> AuthorizationGateway<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Asks for read access to every tracked metric. Safe to call repeatedly.
    ///
    /// A partial grant is not reported here; queries for scopes the user
    /// declined simply come back empty later.
    pub async fn request_authorization(&self) -> Result<(), AuthorizationError> {
        match self.store.request_access(&READ_SCOPES).await {
            Ok(()) => {
                log_info!("health read access granted for {} scopes", READ_SCOPES.len());
                Ok(())
            }
            Err(err) => {
                log_warn!("health read access failed: {err}");
                Err(err)
            }
        }
    }
}
