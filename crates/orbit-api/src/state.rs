//! Application state.

use std::sync::Arc;

use tracing::{error, info};

use orbit_store::{DocumentStore, MongoStore};

use crate::auth::{FirebaseVerifier, TokenVerifier};
use crate::config::ApiConfig;

/// Shared application state, built once at startup and injected into every
/// handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Create new application state from the environment.
    ///
    /// Connectivity to MongoDB is checked with a ping; a failure (including
    /// an unresolvable host) is logged and startup continues.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let verifier = FirebaseVerifier::from_env().await?;
        info!(project_id = %verifier.project_id(), "Firebase token verifier ready");

        // Only a malformed URI or missing credentials fails here; the
        // cluster is contacted lazily.
        let store = MongoStore::from_env()?;
        match store.ping().await {
            Ok(()) => info!("Successfully pinged MongoDB"),
            Err(e) => error!("MongoDB connection error: {}", e),
        }

        Ok(Self::with_components(config, Arc::new(store), Arc::new(verifier)))
    }

    /// Assemble state from already-built components.
    pub fn with_components(
        config: ApiConfig,
        store: Arc<dyn DocumentStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config,
            store,
            verifier,
        }
    }
}
