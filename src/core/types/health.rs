//! Health probe types

use crate::core::providers::unified_provider::{ErrorKind, ProviderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single connectivity probe
///
/// A failed probe is ordinary data: `succeeded` is false and the error kind
/// and detail describe why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProbeResult {
    /// Probed provider
    pub provider_id: String,
    /// Whether the connectivity check passed
    pub succeeded: bool,
    /// Error kind when the probe failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable error detail when the probe failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Probe latency in milliseconds
    pub latency_ms: u64,
    /// When the probe completed
    pub tested_at: DateTime<Utc>,
}

impl HealthProbeResult {
    /// A passing probe
    pub fn success(provider_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.into(),
            succeeded: true,
            error_kind: None,
            detail: None,
            latency_ms,
            tested_at: Utc::now(),
        }
    }

    /// A failing probe
    pub fn failure(provider_id: impl Into<String>, error: &ProviderError, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.into(),
            succeeded: false,
            error_kind: Some(error.kind()),
            detail: Some(error.to_string()),
            latency_ms,
            tested_at: Utc::now(),
        }
    }
}
