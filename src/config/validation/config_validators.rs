//! Configuration section validators

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Hard ceiling on `dispatch.max_retries_limit`
const MAX_RETRIES_CEILING: u32 = 100;
/// Hard ceiling on `dispatch.max_timeout_secs`
const MAX_TIMEOUT_CEILING_SECS: u64 = 3_600;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        Validate::validate(&self.server)?;
        self.logging.validate()?;
        self.dispatch.validate()?;
        self.health.validate()?;

        let mut ids = HashSet::new();
        for provider in &self.providers {
            if !ids.insert(provider.id.as_str()) {
                return Err(format!("Duplicate provider id: {}", provider.id));
            }
            provider.validate()?;
        }

        for id in &self.dispatch.fallback_order {
            if !ids.contains(id.as_str()) {
                return Err(format!("Fallback order references unknown provider: {}", id));
            }
        }

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Server workers must be greater than 0 when set".to_string());
        }

        self.cors.validate()
    }
}

impl Validate for ProviderDescriptor {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating provider descriptor: {}", self.id);

        if self.id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }

        if !self.kind.is_buildable() {
            return Err(format!(
                "Provider {} has kind '{}' which cannot be built from configuration",
                self.id, self.kind
            ));
        }

        if let Some(endpoint) = &self.settings.endpoint {
            let url = Url::parse(endpoint)
                .map_err(|e| format!("Provider {} endpoint is not a valid URL: {}", self.id, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "Provider {} endpoint must use http:// or https://, got: {}",
                    self.id,
                    url.scheme()
                ));
            }
        }

        if self.settings.timeout_secs == Some(0) {
            return Err(format!("Provider {} timeout must be greater than 0", self.id));
        }

        if let Some(temperature) = self.settings.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Provider {} temperature must be between 0.0 and 2.0",
                    self.id
                ));
            }
        }

        if self.settings.max_tokens == Some(0) {
            return Err(format!("Provider {} max_tokens must be greater than 0", self.id));
        }

        Ok(())
    }
}

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("Dispatch timeout must be greater than 0".to_string());
        }

        if self.backoff_multiplier < 1.0 {
            return Err("Backoff multiplier must be at least 1.0".to_string());
        }

        if !(0.0..=1.0).contains(&self.jitter) {
            return Err("Jitter must be between 0.0 and 1.0".to_string());
        }

        if self.base_delay_ms > self.max_delay_ms {
            return Err("Base delay cannot exceed max delay".to_string());
        }

        if self.max_retries_limit > MAX_RETRIES_CEILING {
            return Err(format!(
                "Max retries limit cannot exceed {}",
                MAX_RETRIES_CEILING
            ));
        }

        if self.max_retries > self.max_retries_limit {
            return Err(format!(
                "Max retries {} exceeds the max retries limit {}",
                self.max_retries, self.max_retries_limit
            ));
        }

        if self.max_timeout_secs > MAX_TIMEOUT_CEILING_SECS {
            return Err(format!(
                "Max timeout cannot exceed {} seconds",
                MAX_TIMEOUT_CEILING_SECS
            ));
        }

        if self.timeout_secs > self.max_timeout_secs {
            return Err(format!(
                "Dispatch timeout {}s exceeds the max timeout {}s",
                self.timeout_secs, self.max_timeout_secs
            ));
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.probe_timeout_secs == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }

        if self.max_concurrent_probes == 0 {
            return Err("Max concurrent probes must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.contains('=') || self.level.contains(',') {
            return EnvFilter::try_new(&self.level)
                .map(|_| ())
                .map_err(|e| format!("Invalid log filter '{}': {}", self.level, e));
        }

        self.level
            .parse::<LevelFilter>()
            .map(|_| ())
            .map_err(|_| format!("Invalid log level '{}'", self.level))
    }
}
