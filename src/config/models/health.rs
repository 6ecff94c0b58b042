//! Health probing configuration

use super::*;
use crate::core::health::ProbeSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health probing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Timeout for providers that don't set their own
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
    /// Background probe interval; 0 disables periodic probing
    #[serde(default)]
    pub interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            max_concurrent_probes: default_max_concurrent_probes(),
            interval_secs: 0,
        }
    }
}

impl HealthConfig {
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            max_concurrent: self.max_concurrent_probes,
        }
    }

    /// Periodic probe interval, if enabled
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}
