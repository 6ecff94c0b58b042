//! Health prober
//!
//! Runs connectivity checks concurrently. Every probe runs in its own task
//! under its own timeout, so one hanging or panicking adapter only ever
//! produces a failed result for itself.

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::providers::provider_registry::{ProviderRegistry, RegisteredProvider};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::providers::LLMProvider;
use crate::core::stats::StatsAggregator;
use crate::core::types::HealthProbeResult;

/// Probe timeout and concurrency limits
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    /// Used for providers without their own `timeout_secs`
    pub probe_timeout: Duration,
    /// Upper bound on probes in flight at once
    pub max_concurrent: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(10),
            max_concurrent: 8,
        }
    }
}

/// Concurrent connectivity tester
#[derive(Debug, Clone)]
pub struct HealthProber {
    registry: Arc<ProviderRegistry>,
    stats: Arc<StatsAggregator>,
    settings: ProbeSettings,
}

impl HealthProber {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        stats: Arc<StatsAggregator>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            registry,
            stats,
            settings,
        }
    }

    pub fn settings(&self) -> ProbeSettings {
        self.settings
    }

    /// Probe every enabled provider
    ///
    /// Always returns one result per enabled provider; failures are data.
    pub async fn test_all(&self) -> BTreeMap<String, HealthProbeResult> {
        let entries = self.registry.enabled_entries();
        debug!(count = entries.len(), "probing enabled providers");

        let results: Vec<HealthProbeResult> = stream::iter(entries)
            .map(|entry| self.probe_entry(entry))
            .buffer_unordered(self.settings.max_concurrent.max(1))
            .collect()
            .await;

        let healthy = results.iter().filter(|r| r.succeeded).count();
        info!(total = results.len(), healthy, "health probe batch finished");

        results
            .into_iter()
            .map(|result| (result.provider_id.clone(), result))
            .collect()
    }

    /// Probe a single provider, enabled or not
    pub async fn test_one(&self, provider_id: &str) -> Result<HealthProbeResult, ProviderError> {
        let entry = self.registry.get(provider_id)?;
        Ok(self.probe_entry(entry).await)
    }

    async fn probe_entry(&self, entry: Arc<RegisteredProvider>) -> HealthProbeResult {
        let provider_id = entry.id().to_string();
        let recorder = self.stats.tracked(&provider_id);
        let timeout = entry.descriptor.timeout().unwrap_or(self.settings.probe_timeout);
        let started = Instant::now();

        let task = tokio::spawn(async move {
            tokio::time::timeout(timeout, entry.provider.test_connectivity()).await
        });

        let outcome = match task.await {
            Ok(Ok(result)) => result,
            Ok(Err(_elapsed)) => Err(ProviderError::timeout(
                &provider_id,
                format!("connectivity test exceeded {}ms", timeout.as_millis()),
            )),
            Err(join_error) => Err(ProviderError::backend(
                &provider_id,
                format!("connectivity test aborted: {}", join_error),
            )),
        };
        let latency_ms = started.elapsed().as_millis() as u64;

        let result = match &outcome {
            Ok(()) => {
                debug!(provider = %provider_id, latency_ms, "probe succeeded");
                HealthProbeResult::success(&provider_id, latency_ms)
            }
            Err(error) => {
                warn!(provider = %provider_id, kind = %error.kind(), error = %error, "probe failed");
                HealthProbeResult::failure(&provider_id, error, latency_ms)
            }
        };

        if let Some(recorder) = recorder {
            recorder.record_probe(result.succeeded, outcome.err().map(|error| error.to_body()));
        }

        result
    }

    /// Probe all enabled providers every `interval` until `shutdown` fires
    pub fn spawn_periodic(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "starting periodic health probing");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = self.test_all() => {}
                        }
                    }
                }
            }
            info!("periodic health probing stopped");
        })
    }
}
