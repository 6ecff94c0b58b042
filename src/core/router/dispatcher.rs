//! Dispatcher
//!
//! Resolves a provider, runs the attempt loop under the per-attempt timeout
//! and retry policy, and records exactly one terminal outcome per logical
//! dispatch. Nothing is recorded for a dispatch that is cancelled or whose
//! future is dropped, because recording only happens after the loop ends.

use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, error, info_span, warn};

use super::config::{DispatchLimits, DispatchOptions, RetryPolicy};
use super::execution::{AttemptState, calculate_retry_delay};
use crate::core::providers::provider_registry::{ProviderRegistry, RegisteredProvider};
use crate::core::providers::unified_provider::{ProviderError, ProviderFailure};
use crate::core::providers::LLMProvider;
use crate::core::stats::StatsAggregator;
use crate::core::types::{RequestEnvelope, ResponseEnvelope};

/// Terminal result of the attempt loop plus the latency of its last attempt
struct AttemptOutcome {
    result: Result<ResponseEnvelope, ProviderError>,
    latency_ms: u64,
}

/// Routes requests to providers with retry and fallback
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    stats: Arc<StatsAggregator>,
    policy: RetryPolicy,
    default_options: DispatchOptions,
    limits: DispatchLimits,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        stats: Arc<StatsAggregator>,
        policy: RetryPolicy,
        default_options: DispatchOptions,
    ) -> Self {
        Self {
            registry,
            stats,
            policy,
            default_options,
            limits: DispatchLimits::default(),
        }
    }

    /// Replace the bounds applied to every call's options
    pub fn with_limits(mut self, limits: DispatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &DispatchLimits {
        &self.limits
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Options used when the caller supplies none
    pub fn default_options(&self) -> &DispatchOptions {
        &self.default_options
    }

    /// Dispatch to one provider
    ///
    /// Fails with `NotFound` for an unknown or disabled provider,
    /// `ExhaustedRetries` when transient failures use up every attempt,
    /// the original error for non-transient failures, and `Cancelled` when
    /// the options' token fires.
    pub async fn dispatch(
        &self,
        provider_id: &str,
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> Result<ResponseEnvelope, ProviderError> {
        let span = info_span!("dispatch", provider = provider_id, trace_id = %request.trace_id);
        self.dispatch_inner(provider_id, request, options)
            .instrument(span)
            .await
    }

    async fn dispatch_inner(
        &self,
        provider_id: &str,
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> Result<ResponseEnvelope, ProviderError> {
        let entry = self.registry.get_enabled(provider_id)?;
        let recorder = self.stats.tracked(provider_id);

        let outcome = match &options.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("dispatch cancelled by caller");
                        return Err(ProviderError::cancelled(provider_id));
                    }
                    outcome = self.run_attempts(&entry, request, options) => outcome,
                }
            }
            None => self.run_attempts(&entry, request, options).await,
        };

        if let Some(recorder) = recorder {
            match &outcome.result {
                Ok(_) => recorder.record_success(outcome.latency_ms),
                Err(error) => recorder.record_failure(outcome.latency_ms, error),
            }
        }

        outcome.result
    }

    async fn run_attempts(
        &self,
        entry: &RegisteredProvider,
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> AttemptOutcome {
        let provider_id = entry.id();
        let (timeout, max_attempts) = self.limits.clamp(options);
        let mut state = AttemptState::Idle;

        loop {
            state = state.send();
            let attempt = state.attempt();
            debug!(attempt, max_attempts, "sending attempt");

            let started = Instant::now();
            let result = match tokio::time::timeout(timeout, entry.provider.dispatch(request)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(ProviderError::timeout(
                    provider_id,
                    format!("attempt {} exceeded {}ms", attempt, timeout.as_millis()),
                )),
            };
            let latency_ms = started.elapsed().as_millis() as u64;

            let error = match result {
                Ok(mut response) => {
                    let done = state.succeed();
                    debug!(attempt = done.attempt(), latency_ms, "attempt succeeded");
                    response.provider_id = provider_id.to_string();
                    response.latency_ms = latency_ms;
                    response.attempts = done.attempt();
                    response.trace_id = request.trace_id.clone();
                    return AttemptOutcome {
                        result: Ok(response),
                        latency_ms,
                    };
                }
                Err(error) => error,
            };

            state = state.fail(&error, max_attempts);
            match state {
                AttemptState::TransientFailure { attempt } => {
                    let delay = calculate_retry_delay(&self.policy, attempt, error.retry_after());
                    warn!(
                        attempt,
                        kind = %error.kind(),
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => {
                    let result = if error.is_transient() {
                        ProviderError::exhausted(provider_id, attempt, error)
                    } else {
                        error
                    };
                    error!(attempt, kind = %result.kind(), error = %result, "dispatch failed");
                    return AttemptOutcome {
                        result: Err(result),
                        latency_ms,
                    };
                }
            }
        }
    }

    /// Try providers in order, returning the first success
    ///
    /// Each provider gets the full retry policy. Cancellation stops the
    /// chain immediately; otherwise every terminal failure, `NotFound`
    /// included, is collected in order into `AllProvidersFailed`.
    pub async fn dispatch_with_fallback<S: AsRef<str>>(
        &self,
        provider_ids: &[S],
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> Result<ResponseEnvelope, ProviderError> {
        let mut failures = Vec::with_capacity(provider_ids.len());

        for provider_id in provider_ids {
            let provider_id = provider_id.as_ref();
            match self.dispatch(provider_id, request, options).await {
                Ok(response) => {
                    if !failures.is_empty() {
                        debug!(
                            provider = provider_id,
                            skipped = failures.len(),
                            "fallback provider served request"
                        );
                    }
                    return Ok(response);
                }
                Err(error @ ProviderError::Cancelled { .. }) => return Err(error),
                Err(error) => {
                    warn!(provider = provider_id, kind = %error.kind(), "provider failed, falling back");
                    failures.push(ProviderFailure::new(provider_id, error));
                }
            }
        }

        Err(ProviderError::all_failed(failures))
    }
}
