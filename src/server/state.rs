//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::ProviderHub;
use std::sync::Arc;

/// HTTP server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Provider hub serving every route
    pub hub: Arc<ProviderHub>,
}

impl AppState {
    pub fn new(config: Config, hub: Arc<ProviderHub>) -> Self {
        Self {
            config: Arc::new(config),
            hub,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
