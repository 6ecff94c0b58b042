//! Dispatch configuration: timeouts, retry/backoff and the default fallback chain

use super::*;
use crate::core::router::{DispatchLimits, DispatchOptions, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-attempt timeout in seconds
    #[serde(default = "default_dispatch_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff base delay in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the computed delay
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    /// Highest retry count a caller may ask for
    #[serde(default = "default_max_retries_limit")]
    pub max_retries_limit: u32,
    /// Longest per-attempt timeout a caller may ask for, in seconds
    #[serde(default = "default_max_timeout_secs")]
    pub max_timeout_secs: u64,
    /// Provider ids tried in order when a caller names no provider
    #[serde(default)]
    pub fallback_order: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_dispatch_timeout_secs(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
            max_retries_limit: default_max_retries_limit(),
            max_timeout_secs: default_max_timeout_secs(),
            fallback_order: Vec::new(),
        }
    }
}

impl DispatchConfig {
    /// Backoff policy described by this section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
        }
    }

    /// Bounds on per-call overrides
    pub fn limits(&self) -> DispatchLimits {
        DispatchLimits {
            max_retries: self.max_retries_limit,
            max_timeout: Duration::from_secs(self.max_timeout_secs),
        }
    }

    /// Options applied to calls that don't carry their own
    pub fn default_options(&self) -> DispatchOptions {
        DispatchOptions::new(Duration::from_secs(self.timeout_secs), self.max_retries)
    }
}
