//! Execution helpers for dispatch
//!
//! Pure functions used by the dispatcher: which errors are retried, how
//! long to wait, and the per-attempt state machine.

use super::config::RetryPolicy;
use crate::core::providers::unified_provider::ProviderError;
use std::time::Duration;

/// Check if an error is retried locally
pub fn is_transient(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::Timeout { .. } | ProviderError::RateLimit { .. } | ProviderError::Backend { .. }
    )
}

/// Calculate the wait before the next attempt
///
/// `failed_attempt` is the 1-based number of the attempt that just failed.
/// The delay is `base * multiplier^(failed_attempt - 1)`, raised to at least
/// `retry_after` seconds when the backend asked for it and capped at
/// `max_delay`. Up to `jitter * delay` of random extra is added last, so the
/// result can exceed `max_delay` by that fraction.
pub fn calculate_retry_delay(
    policy: &RetryPolicy,
    failed_attempt: u32,
    retry_after: Option<u64>,
) -> Duration {
    let exponent = failed_attempt.saturating_sub(1).min(63) as i32;
    let base_ms = policy.base_delay.as_millis() as f64;
    let max_ms = policy.max_delay.as_millis() as f64;

    let mut delay_ms = base_ms * policy.backoff_multiplier.max(1.0).powi(exponent);
    if let Some(seconds) = retry_after {
        delay_ms = delay_ms.max(seconds as f64 * 1000.0);
    }
    let delay_ms = delay_ms.min(max_ms).max(0.0);

    let jitter_ms = if policy.jitter > 0.0 {
        delay_ms * policy.jitter * rand::random::<f64>()
    } else {
        0.0
    };

    Duration::from_millis((delay_ms + jitter_ms) as u64)
}

/// Per-attempt state
///
/// `Idle -> Sent -> {Succeeded | TransientFailure | FatalFailure}`;
/// `TransientFailure` goes back to `Sent` while attempts remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Sent { attempt: u32 },
    Succeeded { attempt: u32 },
    TransientFailure { attempt: u32 },
    FatalFailure { attempt: u32 },
}

impl AttemptState {
    /// Issue the next attempt
    pub fn send(self) -> Self {
        match self {
            AttemptState::Idle => AttemptState::Sent { attempt: 1 },
            AttemptState::TransientFailure { attempt } => AttemptState::Sent {
                attempt: attempt + 1,
            },
            other => other,
        }
    }

    /// The in-flight attempt succeeded
    pub fn succeed(self) -> Self {
        match self {
            AttemptState::Sent { attempt } => AttemptState::Succeeded { attempt },
            other => other,
        }
    }

    /// The in-flight attempt failed with `error`
    pub fn fail(self, error: &ProviderError, max_attempts: u32) -> Self {
        match self {
            AttemptState::Sent { attempt } if is_transient(error) && attempt < max_attempts => {
                AttemptState::TransientFailure { attempt }
            }
            AttemptState::Sent { attempt } => AttemptState::FatalFailure { attempt },
            other => other,
        }
    }

    /// Number of attempts issued so far
    pub fn attempt(self) -> u32 {
        match self {
            AttemptState::Idle => 0,
            AttemptState::Sent { attempt }
            | AttemptState::Succeeded { attempt }
            | AttemptState::TransientFailure { attempt }
            | AttemptState::FatalFailure { attempt } => attempt,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttemptState::Succeeded { .. } | AttemptState::FatalFailure { .. }
        )
    }
}
