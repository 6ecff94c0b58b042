//! Top-level gateway configuration

use super::*;
use crate::core::providers::ProviderKind;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Id of the provider created when no configuration file is present
pub const DEFAULT_PROVIDER_ID: &str = "leo";

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider descriptors
    #[serde(default)]
    pub providers: Vec<ProviderDescriptor>,
    /// Dispatch configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Health probing configuration
    #[serde(default)]
    pub health: HealthConfig,
}

impl GatewayConfig {
    /// Configuration with a single local LM Studio provider, then environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            providers: vec![
                ProviderDescriptor::new(DEFAULT_PROVIDER_ID, ProviderKind::LmStudio)
                    .with_endpoint(default_lm_studio_url())
                    .with_model(default_leo_model()),
            ],
            ..Default::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `ACAS_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `ACAS_*` overrides read through `lookup`
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ACAS_HOST") {
            debug!("Overriding server host from ACAS_HOST");
            self.server.host = host;
        }
        if let Some(port) = lookup("ACAS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid ACAS_PORT '{}': {}", port, e)))?;
        }
        if let Some(level) = lookup("ACAS_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        let lm_studio_url = lookup("ACAS_LM_STUDIO_URL");
        let leo_model = lookup("ACAS_LEO_MODEL");
        for descriptor in self
            .providers
            .iter_mut()
            .filter(|d| d.kind == ProviderKind::LmStudio)
        {
            if let Some(url) = &lm_studio_url {
                descriptor.settings.endpoint = Some(url.clone());
            }
            if let Some(model) = &leo_model {
                descriptor.settings.model = Some(model.clone());
            }
        }
        Ok(())
    }
}
