//! Provider adapters behind one closed enum
//!
//! Holds the [`Provider`] enum, the backend adapters,
//! the registry and the factory that turns descriptors into adapters.

pub mod base;

pub mod anthropic;
pub mod openai;

// Registry, secrets and unified error
pub mod provider_registry;
pub mod secrets;
pub mod unified_provider;


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use crate::core::traits::LLMProvider;
use crate::config::models::provider::ProviderDescriptor;
use crate::core::types::{RequestEnvelope, ResponseEnvelope};
use crate::utils::error::{GatewayError, Result};
use base::GlobalPoolManager;
use secrets::SecretResolver;
pub use provider_registry::{ProviderRegistry, RegisteredProvider};
pub use unified_provider::{ErrorBody, ErrorKind, ProviderError, ProviderFailure};

/// Backend kind of a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderKind {
    OpenAI,
    LmStudio,
    Anthropic,
    /// Externally supplied implementation, labelled by the embedder
    Custom(String),
}

impl ProviderKind {
    /// Whether descriptors of this kind can be built from configuration
    pub fn is_buildable(&self) -> bool {
        !matches!(self, ProviderKind::Custom(_))
    }
}

impl From<&str> for ProviderKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" => ProviderKind::OpenAI,
            "lm_studio" | "lmstudio" | "lm-studio" => ProviderKind::LmStudio,
            "anthropic" | "claude" => ProviderKind::Anthropic,
            _ => ProviderKind::Custom(s.to_string()),
        }
    }
}

impl From<String> for ProviderKind {
    fn from(s: String) -> Self {
        ProviderKind::from(s.as_str())
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::LmStudio => write!(f, "lm_studio"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Unified Provider Enum
///
/// One variant per backend kind plus `Custom` for injected implementations.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAI(openai::OpenAIProvider),
    LmStudio(openai::OpenAIProvider),
    Anthropic(anthropic::AnthropicProvider),
    Custom(Arc<dyn LLMProvider>),
}

macro_rules! dispatch_provider {
    ($self:expr, $method:ident) => {
        match $self {
            Provider::OpenAI(p) => p.$method(),
            Provider::LmStudio(p) => p.$method(),
            Provider::Anthropic(p) => p.$method(),
            Provider::Custom(p) => p.$method(),
        }
    };
}

macro_rules! dispatch_provider_async {
    ($self:expr, $method:ident, $($arg:expr),*) => {
        match $self {
            Provider::OpenAI(p) => p.$method($($arg),*).await,
            Provider::LmStudio(p) => p.$method($($arg),*).await,
            Provider::Anthropic(p) => p.$method($($arg),*).await,
            Provider::Custom(p) => p.$method($($arg),*).await,
        }
    };
}

impl Provider {
    /// Wrap an external implementation
    pub fn custom(provider: impl LLMProvider + 'static) -> Self {
        Provider::Custom(Arc::new(provider))
    }

    /// Backend kind of this adapter
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAI(_) => ProviderKind::OpenAI,
            Provider::LmStudio(_) => ProviderKind::LmStudio,
            Provider::Anthropic(_) => ProviderKind::Anthropic,
            Provider::Custom(p) => ProviderKind::Custom(p.identify().to_string()),
        }
    }
}

#[async_trait]
impl LLMProvider for Provider {
    fn id(&self) -> &str {
        dispatch_provider!(self, id)
    }

    fn identify(&self) -> &str {
        dispatch_provider!(self, identify)
    }

    async fn test_connectivity(&self) -> std::result::Result<(), ProviderError> {
        dispatch_provider_async!(self, test_connectivity,)
    }

    async fn dispatch(
        &self,
        request: &RequestEnvelope,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        dispatch_provider_async!(self, dispatch, request)
    }
}

/// Builds adapters from descriptors
///
/// Credentials are resolved here; an unresolvable reference leaves the
/// adapter without a credential so it reports `AuthError` when used.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    secrets: Arc<dyn SecretResolver>,
    pool_manager: GlobalPoolManager,
}

impl ProviderFactory {
    pub fn new(secrets: Arc<dyn SecretResolver>) -> Result<Self> {
        Ok(Self {
            secrets,
            pool_manager: GlobalPoolManager::new()?,
        })
    }

    /// Create a provider from its descriptor
    pub fn build(&self, descriptor: &ProviderDescriptor) -> Result<Provider> {
        let api_key = descriptor.settings.credential.as_ref().and_then(|reference| {
            let resolved = self.secrets.resolve(reference);
            if resolved.is_none() {
                tracing::warn!(
                    provider = %descriptor.id,
                    credential = %reference,
                    "credential reference could not be resolved"
                );
            }
            resolved
        });

        let provider = match &descriptor.kind {
            ProviderKind::OpenAI => Provider::OpenAI(openai::OpenAIProvider::new(
                openai::OpenAIConfig::from_descriptor(descriptor, openai::OpenAIFlavor::OpenAI, api_key),
                self.pool_manager.clone(),
            )),
            ProviderKind::LmStudio => Provider::LmStudio(openai::OpenAIProvider::new(
                openai::OpenAIConfig::from_descriptor(descriptor, openai::OpenAIFlavor::LmStudio, api_key),
                self.pool_manager.clone(),
            )),
            ProviderKind::Anthropic => Provider::Anthropic(anthropic::AnthropicProvider::new(
                anthropic::AnthropicConfig::from_descriptor(descriptor, api_key),
                self.pool_manager.clone(),
            )),
            ProviderKind::Custom(label) => {
                return Err(GatewayError::Config(format!(
                    "provider '{}' has custom kind '{}' which must be registered programmatically",
                    descriptor.id, label
                )));
            }
        };

        Ok(provider)
    }
}
