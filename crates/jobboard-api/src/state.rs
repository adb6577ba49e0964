//! Application state.

use std::sync::Arc;

use anyhow::Context;
use jobboard_store::{DocumentStore, StoreConfig};

use crate::auth::SessionKeys;
use crate::config::ApiConfig;
use crate::services::ApplicationService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn DocumentStore>,
    pub sessions: Arc<SessionKeys>,
    pub applications: ApplicationService,
}

impl AppState {
    /// Create application state with the store selected by the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let store_config = StoreConfig::from_env().context("invalid store configuration")?;
        let store = jobboard_store::connect(&store_config)
            .await
            .context("failed to create document store")?;

        Ok(Self::with_store(config, store))
    }

    /// Create application state around an existing store.
    pub fn with_store(config: ApiConfig, store: Arc<dyn DocumentStore>) -> Self {
        let sessions = Arc::new(SessionKeys::new(&config.jwt_secret, config.session_ttl));
        let applications = ApplicationService::new(Arc::clone(&store));
        Self {
            config,
            store,
            sessions,
            applications,
        }
    }
}
