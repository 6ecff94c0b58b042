//! OpenAI Provider Configuration

use std::time::Duration;

use crate::config::models::provider::ProviderDescriptor;
use crate::core::providers::secrets::SecretValue;

/// Hosted OpenAI API
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Local LM Studio server
pub const LM_STUDIO_DEFAULT_ENDPOINT: &str = "http://localhost:1234";
pub const LM_STUDIO_DEFAULT_MODEL: &str = "meta-llama-3.1-8b-instruct";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which OpenAI-compatible server this adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIFlavor {
    OpenAI,
    LmStudio,
}

impl OpenAIFlavor {
    /// Kind label reported by `identify()`
    pub fn label(self) -> &'static str {
        match self {
            OpenAIFlavor::OpenAI => "openai",
            OpenAIFlavor::LmStudio => "lm_studio",
        }
    }

    /// Local servers accept unauthenticated requests
    pub fn requires_credential(self) -> bool {
        matches!(self, OpenAIFlavor::OpenAI)
    }

    fn default_endpoint(self) -> &'static str {
        match self {
            OpenAIFlavor::OpenAI => OPENAI_DEFAULT_ENDPOINT,
            OpenAIFlavor::LmStudio => LM_STUDIO_DEFAULT_ENDPOINT,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            OpenAIFlavor::OpenAI => OPENAI_DEFAULT_MODEL,
            OpenAIFlavor::LmStudio => LM_STUDIO_DEFAULT_MODEL,
        }
    }
}

/// Resolved adapter configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub id: String,
    pub flavor: OpenAIFlavor,
    pub endpoint: String,
    pub api_key: Option<SecretValue>,
    pub model: String,
    pub timeout: Duration,
    pub default_temperature: Option<f32>,
    pub default_max_tokens: Option<u32>,
}

impl OpenAIConfig {
    /// Build from a descriptor and its resolved credential
    pub fn from_descriptor(
        descriptor: &ProviderDescriptor,
        flavor: OpenAIFlavor,
        api_key: Option<SecretValue>,
    ) -> Self {
        let settings = &descriptor.settings;
        Self {
            id: descriptor.id.clone(),
            flavor,
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| flavor.default_endpoint().to_string()),
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| flavor.default_model().to_string()),
            timeout: descriptor
                .timeout()
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            default_temperature: settings.temperature,
            default_max_tokens: settings.max_tokens,
        }
    }
}
