//! Provider descriptors

use super::*;
use crate::core::providers::ProviderKind;
use crate::core::providers::secrets::CredentialRef;
use serde::{Deserialize, Serialize};

/// Backend connection settings of one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL; the adapter's default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Reference to the credential, resolved through the secret resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialRef>,
    /// Model name sent to the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Per-provider request and probe timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Temperature used when a request leaves it unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Token limit used when a request leaves it unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One configured provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique registry id
    pub id: String,
    /// Backend kind
    pub kind: ProviderKind,
    /// Connection settings
    #[serde(flatten)]
    pub settings: ProviderSettings,
    /// Whether the provider takes traffic and is probed
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderDescriptor {
    /// Create an enabled descriptor with default settings
    pub fn new(id: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            id: id.into(),
            kind,
            settings: ProviderSettings::default(),
            enabled: true,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.settings.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.settings.credential = Some(CredentialRef::new(credential));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = Some(model.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.settings.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Per-provider timeout, if configured
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.settings
            .timeout_secs
            .map(std::time::Duration::from_secs)
    }
}
