//! Application state.

use std::sync::Arc;

use solo_store::{BidRepository, JobRepository, StoreClient};

use crate::config::ApiConfig;
use crate::policy::AuthPolicy;

/// Shared application state.
///
/// One storage handle opened at startup and reused for the process
/// lifetime; repositories are cheap views over it.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<StoreClient>,
    pub jobs: JobRepository,
    pub bids: BidRepository,
    pub policy: AuthPolicy,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Arc::new(StoreClient::from_env().await?);
        Ok(Self::with_store(config, store))
    }

    /// Build state over an existing storage handle, reading the
    /// authorization policy from the environment.
    pub fn with_store(config: ApiConfig, store: Arc<StoreClient>) -> Self {
        Self::with_policy(config, store, AuthPolicy::from_env())
    }

    /// Build state with an explicit authorization policy (used by tests,
    /// which must not depend on ambient `AUTH_POLICY`).
    pub fn with_policy(config: ApiConfig, store: Arc<StoreClient>, policy: AuthPolicy) -> Self {
        let jobs = JobRepository::new(&store);
        let bids = BidRepository::new(&store);

        Self {
            config,
            store,
            jobs,
            bids,
            policy,
        }
    }
}
