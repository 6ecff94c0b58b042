//! Dispatch configuration types
//!
//! ## Defaults
//!
//! - `timeout`: 30 s per attempt
//! - `max_retries`: 2 (three attempts in total)
//! - `base_delay`: 200 ms
//! - `max_delay`: 10 s
//! - `backoff_multiplier`: 2.0
//! - `jitter`: 0.1 (up to 10% added to each delay)
//! - limits: at most 10 retries and a 300 s attempt timeout per call

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Exponential backoff parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap on the backoff and retry-after floor, applied before jitter
    pub max_delay: Duration,
    /// Growth factor per retry
    pub backoff_multiplier: f64,
    /// Fraction of the capped delay added as random jitter
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Policy without any waiting, for tests and local backends
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: 0.0,
        }
    }
}

/// Per-call dispatch options
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Timeout of each individual attempt
    pub timeout: Duration,
    /// Retries after the first attempt on transient failures
    pub max_retries: u32,
    /// Abandons the dispatch when cancelled
    pub cancellation: Option<CancellationToken>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            cancellation: None,
        }
    }
}

impl DispatchOptions {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            timeout,
            max_retries,
            cancellation: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Upper bounds on per-call overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLimits {
    pub max_retries: u32,
    pub max_timeout: Duration,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_retries: 10,
            max_timeout: Duration::from_secs(300),
        }
    }
}

impl DispatchLimits {
    /// Apply caller overrides to `base`, rejecting values outside the limits
    pub fn override_options(
        &self,
        base: &DispatchOptions,
        timeout_secs: Option<u64>,
        max_retries: Option<u32>,
    ) -> Result<DispatchOptions, String> {
        let mut options = base.clone();
        if let Some(timeout_secs) = timeout_secs {
            if timeout_secs == 0 {
                return Err("timeout_secs must be greater than 0".to_string());
            }
            if timeout_secs > self.max_timeout.as_secs() {
                return Err(format!(
                    "timeout_secs {} exceeds the limit of {}",
                    timeout_secs,
                    self.max_timeout.as_secs()
                ));
            }
            options = options.with_timeout(Duration::from_secs(timeout_secs));
        }
        if let Some(max_retries) = max_retries {
            if max_retries > self.max_retries {
                return Err(format!(
                    "max_retries {} exceeds the limit of {}",
                    max_retries, self.max_retries
                ));
            }
            options = options.with_max_retries(max_retries);
        }
        Ok(options)
    }

    /// Attempt timeout and total attempts for `options`, clamped to the limits
    pub fn clamp(&self, options: &DispatchOptions) -> (Duration, u32) {
        (
            options.timeout.min(self.max_timeout),
            options.max_retries.min(self.max_retries).saturating_add(1),
        )
    }
}
