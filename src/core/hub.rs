//! Provider hub
//!
//! The hub owns the registry, stats aggregator, health prober and dispatcher
//! and exposes the operations callers use. It is constructed explicitly and
//! shared behind an `Arc`; there is no process-wide instance.

use crate::config::models::{GatewayConfig, ProviderDescriptor};
use crate::core::health::{HealthProber, ProbeSettings};
use crate::core::providers::secrets::{CredentialRef, SecretResolver};
use crate::core::providers::{
    Provider, ProviderError, ProviderFactory, ProviderKind, ProviderRegistry,
};
use crate::core::router::{DispatchOptions, Dispatcher, RetryPolicy};
use crate::core::stats::{ProviderStats, StatsAggregator};
use crate::core::types::{HealthProbeResult, RequestEnvelope, ResponseEnvelope};
use crate::utils::error::{GatewayError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Public view of a registered provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: String,
    pub kind: ProviderKind,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl From<ProviderDescriptor> for ProviderSummary {
    fn from(descriptor: ProviderDescriptor) -> Self {
        Self {
            id: descriptor.id,
            kind: descriptor.kind,
            enabled: descriptor.enabled,
            model: descriptor.settings.model,
            endpoint: descriptor.settings.endpoint,
        }
    }
}

/// Ids touched by [`ProviderHub::reconfigure`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconfigureReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

impl ReconfigureReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Facade over the provider components
#[derive(Debug)]
pub struct ProviderHub {
    registry: Arc<ProviderRegistry>,
    stats: Arc<StatsAggregator>,
    prober: Arc<HealthProber>,
    dispatcher: Dispatcher,
    factory: ProviderFactory,
    fallback_order: RwLock<Vec<String>>,
}

impl ProviderHub {
    /// Empty hub with default dispatch and probe settings
    pub fn new(secrets: Arc<dyn SecretResolver>) -> Result<Self> {
        Self::with_settings(
            secrets,
            RetryPolicy::default(),
            DispatchOptions::default(),
            ProbeSettings::default(),
        )
    }

    /// Empty hub with explicit settings
    pub fn with_settings(
        secrets: Arc<dyn SecretResolver>,
        policy: RetryPolicy,
        default_options: DispatchOptions,
        probe_settings: ProbeSettings,
    ) -> Result<Self> {
        let registry = Arc::new(ProviderRegistry::new());
        let stats = Arc::new(StatsAggregator::new());
        let prober = Arc::new(HealthProber::new(
            registry.clone(),
            stats.clone(),
            probe_settings,
        ));
        let dispatcher = Dispatcher::new(registry.clone(), stats.clone(), policy, default_options);

        Ok(Self {
            registry,
            stats,
            prober,
            dispatcher,
            factory: ProviderFactory::new(secrets)?,
            fallback_order: RwLock::new(Vec::new()),
        })
    }

    /// Hub populated from configuration
    pub fn from_config(config: &GatewayConfig, secrets: Arc<dyn SecretResolver>) -> Result<Self> {
        let mut hub = Self::with_settings(
            secrets,
            config.dispatch.retry_policy(),
            config.dispatch.default_options(),
            config.health.probe_settings(),
        )?;
        hub.dispatcher = hub.dispatcher.with_limits(config.dispatch.limits());

        for descriptor in &config.providers {
            hub.register(descriptor.clone())?;
        }
        hub.set_fallback_order(config.dispatch.fallback_order.clone());

        info!(providers = hub.registry.len(), "provider hub initialized");
        Ok(hub)
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn prober(&self) -> &Arc<HealthProber> {
        &self.prober
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build the adapter for `descriptor` and register it
    pub fn register(&self, descriptor: ProviderDescriptor) -> Result<()> {
        let provider = self.factory.build(&descriptor)?;
        self.insert(descriptor, provider)?;
        Ok(())
    }

    /// Register an already constructed adapter, typically [`Provider::Custom`]
    pub fn register_provider(
        &self,
        descriptor: ProviderDescriptor,
        provider: Provider,
    ) -> std::result::Result<(), ProviderError> {
        self.insert(descriptor, provider)
    }

    // the stats entry exists before the provider is reachable
    fn insert(
        &self,
        descriptor: ProviderDescriptor,
        provider: Provider,
    ) -> std::result::Result<(), ProviderError> {
        self.stats.track(&descriptor.id);
        self.registry.register(descriptor, provider)
    }

    /// Remove a provider and its statistics; reports whether it was present
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            self.stats.forget(id);
        }
        removed
    }

    /// Registered providers ordered by id, optionally filtered by enabled flag
    pub fn list_providers(&self, enabled: Option<bool>) -> Vec<ProviderSummary> {
        self.registry
            .list(enabled)
            .into_iter()
            .map(ProviderSummary::from)
            .collect()
    }

    /// Probe one provider, enabled or not
    pub async fn test_provider(
        &self,
        id: &str,
    ) -> std::result::Result<HealthProbeResult, ProviderError> {
        self.prober.test_one(id).await
    }

    /// Probe every enabled provider concurrently
    pub async fn test_all_providers(&self) -> BTreeMap<String, HealthProbeResult> {
        self.prober.test_all().await
    }

    /// Statistics of one provider, or of every registered provider
    ///
    /// Providers without recorded activity report zeroed counters.
    pub fn get_stats(&self, id: Option<&str>) -> std::result::Result<Vec<ProviderStats>, ProviderError> {
        let ids = match id {
            Some(id) if self.registry.contains(id) => vec![id.to_string()],
            Some(id) => return Err(ProviderError::not_found(id)),
            None => self.registry.ids(),
        };

        Ok(ids
            .into_iter()
            .map(|id| {
                self.stats
                    .snapshot(&id)
                    .unwrap_or_else(|| ProviderStats::empty(id))
            })
            .collect())
    }

    /// Dispatch with the configured default options
    pub async fn dispatch(
        &self,
        id: &str,
        request: &RequestEnvelope,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        self.dispatcher
            .dispatch(id, request, self.dispatcher.default_options())
            .await
    }

    pub async fn dispatch_with_options(
        &self,
        id: &str,
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        self.dispatcher.dispatch(id, request, options).await
    }

    /// Try `ids` in order with the configured default options
    pub async fn dispatch_with_fallback<S: AsRef<str>>(
        &self,
        ids: &[S],
        request: &RequestEnvelope,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        self.dispatcher
            .dispatch_with_fallback(ids, request, self.dispatcher.default_options())
            .await
    }

    pub async fn dispatch_with_fallback_options<S: AsRef<str>>(
        &self,
        ids: &[S],
        request: &RequestEnvelope,
        options: &DispatchOptions,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        self.dispatcher
            .dispatch_with_fallback(ids, request, options)
            .await
    }

    /// Dispatch along the default chain
    ///
    /// The chain is the configured fallback order, or every enabled provider
    /// in id order when none is configured.
    pub async fn dispatch_default_chain(
        &self,
        request: &RequestEnvelope,
        options: Option<&DispatchOptions>,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        let chain = self.default_chain();
        let options = options.unwrap_or(self.dispatcher.default_options());
        self.dispatcher
            .dispatch_with_fallback(chain.as_slice(), request, options)
            .await
    }

    /// Provider ids tried by [`Self::dispatch_default_chain`]
    pub fn default_chain(&self) -> Vec<String> {
        let order = self.fallback_order.read().clone();
        if order.is_empty() {
            self.registry
                .list(Some(true))
                .into_iter()
                .map(|descriptor| descriptor.id)
                .collect()
        } else {
            order
        }
    }

    pub fn set_fallback_order(&self, order: Vec<String>) {
        *self.fallback_order.write() = order;
    }

    /// Apply a new provider list
    ///
    /// Every new adapter is built before the registry changes, so a bad
    /// descriptor leaves the hub untouched. Providers of custom kinds were
    /// registered programmatically and are left alone.
    pub fn reconfigure(&self, descriptors: &[ProviderDescriptor]) -> Result<ReconfigureReport> {
        let mut seen = HashSet::new();
        for descriptor in descriptors {
            if !seen.insert(descriptor.id.as_str()) {
                return Err(GatewayError::Config(format!(
                    "duplicate provider id in reconfiguration: {}",
                    descriptor.id
                )));
            }
        }

        let mut pending = Vec::new();
        for descriptor in descriptors {
            match self.registry.get(&descriptor.id) {
                Ok(existing) if existing.descriptor == *descriptor => continue,
                Ok(_) => pending.push((true, descriptor.clone(), self.factory.build(descriptor)?)),
                Err(_) => pending.push((false, descriptor.clone(), self.factory.build(descriptor)?)),
            }
        }

        let mut report = ReconfigureReport::default();

        for existing in self.registry.list(None) {
            if existing.kind.is_buildable()
                && !seen.contains(existing.id.as_str())
                && self.unregister(&existing.id)
            {
                report.removed.push(existing.id);
            }
        }

        for (exists, descriptor, provider) in pending {
            let id = descriptor.id.clone();
            if exists {
                match self.registry.replace(descriptor.clone(), provider.clone()) {
                    Ok(()) => report.updated.push(id),
                    Err(_) => {
                        self.insert(descriptor, provider)?;
                        report.added.push(id);
                    }
                }
            } else {
                match self.insert(descriptor.clone(), provider.clone()) {
                    Ok(()) => report.added.push(id),
                    Err(_) => {
                        self.registry.replace(descriptor, provider)?;
                        report.updated.push(id);
                    }
                }
            }
        }

        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            updated = report.updated.len(),
            "providers reconfigured"
        );
        Ok(report)
    }

    /// Toggle whether a provider takes traffic and is probed
    pub fn set_enabled(&self, id: &str, enabled: bool) -> std::result::Result<(), ProviderError> {
        self.registry.set_enabled(id, enabled)
    }

    /// Point a provider at a different credential and rebuild its adapter
    pub fn rotate_credential(&self, id: &str, credential: Option<CredentialRef>) -> Result<()> {
        let descriptor = self.registry.with_credential(id, credential)?;
        let provider = self.factory.build(&descriptor)?;
        self.registry.replace(descriptor, provider)?;
        debug!(provider = id, "credential rotated");
        Ok(())
    }

    /// Start background probing; stops when `shutdown` is cancelled
    pub fn spawn_health_monitor(
        &self,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        self.prober.clone().spawn_periodic(interval, shutdown)
    }
}
