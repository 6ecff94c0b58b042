//! Stats aggregator
//!
//! Each provider owns a block of atomic counters. Writers bump
//! `total_requests` before `total_failures` and snapshots read them in the
//! opposite order, so a snapshot never observes more failures than requests.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::core::providers::unified_provider::{ErrorBody, ProviderError};

/// Last known health of a provider
///
/// Maps to AtomicU8 values:
/// - 0 = Unknown (never probed or used)
/// - 1 = Healthy
/// - 2 = Unhealthy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HealthFlag {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthFlag {
    fn from(value: u8) -> Self {
        match value {
            1 => HealthFlag::Healthy,
            2 => HealthFlag::Unhealthy,
            _ => HealthFlag::Unknown,
        }
    }
}

impl From<bool> for HealthFlag {
    fn from(healthy: bool) -> Self {
        if healthy {
            HealthFlag::Healthy
        } else {
            HealthFlag::Unhealthy
        }
    }
}

impl HealthFlag {
    pub fn as_option(self) -> Option<bool> {
        match self {
            HealthFlag::Unknown => None,
            HealthFlag::Healthy => Some(true),
            HealthFlag::Unhealthy => Some(false),
        }
    }
}

#[derive(Debug, Default)]
struct Timestamps {
    last_tested_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
    last_error: Option<ErrorBody>,
}

/// Live counters of one provider
#[derive(Debug, Default)]
struct ProviderCounters {
    total_requests: AtomicU64,
    total_failures: AtomicU64,
    total_latency_ms: AtomicU64,
    health: AtomicU8,
    timestamps: Mutex<Timestamps>,
}

impl ProviderCounters {
    fn record_outcome(&self, success: bool, latency_ms: u64, error: Option<ErrorBody>) {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
        if !success {
            self.total_failures.fetch_add(1, Ordering::SeqCst);
        }
        self.total_latency_ms.fetch_add(latency_ms, Ordering::SeqCst);
        self.health
            .store(HealthFlag::from(success) as u8, Ordering::SeqCst);

        let mut timestamps = self.timestamps.lock();
        timestamps.last_used_at = Some(Utc::now());
        if error.is_some() {
            timestamps.last_error = error;
        }
    }

    fn record_probe(&self, succeeded: bool, detail: Option<ErrorBody>) {
        self.health
            .store(HealthFlag::from(succeeded) as u8, Ordering::SeqCst);

        let mut timestamps = self.timestamps.lock();
        timestamps.last_tested_at = Some(Utc::now());
        if detail.is_some() {
            timestamps.last_error = detail;
        }
    }

    fn snapshot(&self, provider_id: &str) -> ProviderStats {
        // failures before requests keeps failures <= requests
        let total_failures = self.total_failures.load(Ordering::SeqCst);
        let total_requests = self.total_requests.load(Ordering::SeqCst);
        let total_latency_ms = self.total_latency_ms.load(Ordering::SeqCst);
        let health = HealthFlag::from(self.health.load(Ordering::SeqCst));
        let timestamps = self.timestamps.lock();

        ProviderStats::from_counts(provider_id, total_requests, total_failures, total_latency_ms)
            .with_health(
                health.as_option(),
                timestamps.last_tested_at,
                timestamps.last_used_at,
                timestamps.last_error.clone(),
            )
    }
}

/// Immutable copy of one provider's statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    pub provider_id: String,
    pub total_requests: u64,
    pub total_failures: u64,
    pub total_successes: u64,
    pub total_latency_ms: u64,
    pub average_latency_ms: f64,
    pub success_rate: f64,
    /// `None` until the provider has been probed or used
    pub last_known_healthy: Option<bool>,
    pub last_tested_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub last_error: Option<ErrorBody>,
}

impl ProviderStats {
    /// Zeroed stats for a provider that has no recorded activity
    pub fn empty(provider_id: impl Into<String>) -> Self {
        Self::from_counts(provider_id, 0, 0, 0)
    }

    fn from_counts(
        provider_id: impl Into<String>,
        total_requests: u64,
        total_failures: u64,
        total_latency_ms: u64,
    ) -> Self {
        let (average_latency_ms, success_rate) = if total_requests == 0 {
            (0.0, 0.0)
        } else {
            (
                total_latency_ms as f64 / total_requests as f64,
                (total_requests - total_failures) as f64 / total_requests as f64,
            )
        };

        Self {
            provider_id: provider_id.into(),
            total_requests,
            total_failures,
            total_successes: total_requests - total_failures,
            total_latency_ms,
            average_latency_ms,
            success_rate,
            last_known_healthy: None,
            last_tested_at: None,
            last_used_at: None,
            last_error: None,
        }
    }

    fn with_health(
        mut self,
        last_known_healthy: Option<bool>,
        last_tested_at: Option<DateTime<Utc>>,
        last_used_at: Option<DateTime<Utc>>,
        last_error: Option<ErrorBody>,
    ) -> Self {
        self.last_known_healthy = last_known_healthy;
        self.last_tested_at = last_tested_at;
        self.last_used_at = last_used_at;
        self.last_error = last_error;
        self
    }
}

/// Recording handle bound to one provider's counter block
///
/// Taken when a dispatch or probe starts. Once the provider is forgotten
/// the block is detached from the aggregator and later writes are dropped
/// with it.
#[derive(Debug, Clone)]
pub struct StatsHandle {
    counters: Arc<ProviderCounters>,
}

impl StatsHandle {
    pub fn record_success(&self, latency_ms: u64) {
        self.counters.record_outcome(true, latency_ms, None);
    }

    pub fn record_failure(&self, latency_ms: u64, error: &ProviderError) {
        self.counters
            .record_outcome(false, latency_ms, Some(error.to_body()));
    }

    pub fn record_probe(&self, succeeded: bool, detail: Option<ErrorBody>) {
        self.counters.record_probe(succeeded, detail);
    }
}

/// Concurrent per-provider statistics
///
/// Entries are created by [`track`] or on the first direct record, and
/// live until [`forget`] is called for the provider.
///
/// [`track`]: StatsAggregator::track
/// [`forget`]: StatsAggregator::forget
#[derive(Debug, Default)]
pub struct StatsAggregator {
    counters: DashMap<String, Arc<ProviderCounters>>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, provider_id: &str) -> Arc<ProviderCounters> {
        if let Some(existing) = self.counters.get(provider_id) {
            return existing.clone();
        }
        self.counters
            .entry(provider_id.to_string())
            .or_default()
            .clone()
    }

    /// Make sure `provider_id` has an entry
    pub fn track(&self, provider_id: &str) {
        self.counters(provider_id);
    }

    /// Handle to an existing entry, `None` for an untracked or forgotten id
    pub fn tracked(&self, provider_id: &str) -> Option<StatsHandle> {
        let counters = self.counters.get(provider_id)?.clone();
        Some(StatsHandle { counters })
    }

    /// Record one terminal dispatch outcome
    pub fn record_outcome(&self, provider_id: &str, success: bool, latency_ms: u64) {
        self.counters(provider_id)
            .record_outcome(success, latency_ms, None);
    }

    /// Record a successful dispatch
    pub fn record_success(&self, provider_id: &str, latency_ms: u64) {
        self.record_outcome(provider_id, true, latency_ms);
    }

    /// Record a failed dispatch, keeping the error as `last_error`
    pub fn record_failure(&self, provider_id: &str, latency_ms: u64, error: &ProviderError) {
        self.counters(provider_id)
            .record_outcome(false, latency_ms, Some(error.to_body()));
    }

    /// Record a health probe; dispatch counters are untouched
    pub fn record_probe(&self, provider_id: &str, succeeded: bool, detail: Option<ErrorBody>) {
        self.counters(provider_id).record_probe(succeeded, detail);
    }

    /// Copy of one provider's stats, `None` if nothing was recorded
    pub fn snapshot(&self, provider_id: &str) -> Option<ProviderStats> {
        let counters = self.counters.get(provider_id)?.clone();
        Some(counters.snapshot(provider_id))
    }

    /// Copies of every provider's stats, ordered by id
    pub fn snapshot_all(&self) -> BTreeMap<String, ProviderStats> {
        let entries: Vec<(String, Arc<ProviderCounters>)> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        entries
            .into_iter()
            .map(|(id, counters)| {
                let stats = counters.snapshot(&id);
                (id, stats)
            })
            .collect()
    }

    /// Drop a provider's entry
    pub fn forget(&self, provider_id: &str) -> bool {
        self.counters.remove(provider_id).is_some()
    }

    /// Zero one provider's counters, or all of them
    ///
    /// A fresh counter block replaces the old one, so concurrent writers
    /// never leave a half-reset entry behind.
    pub fn reset(&self, provider_id: Option<&str>) {
        match provider_id {
            Some(id) => {
                if let Some(mut entry) = self.counters.get_mut(id) {
                    *entry = Arc::new(ProviderCounters::default());
                }
            }
            None => self
                .counters
                .iter_mut()
                .for_each(|mut entry| *entry = Arc::new(ProviderCounters::default())),
        }
    }

    /// Number of providers with recorded stats
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
