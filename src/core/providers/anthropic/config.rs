//! Anthropic Provider Configuration

use std::time::Duration;

use crate::config::models::provider::ProviderDescriptor;
use crate::core::providers::secrets::SecretValue;

pub const ANTHROPIC_DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
/// The Messages API requires `max_tokens` on every request
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolved adapter configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub id: String,
    pub endpoint: String,
    pub api_key: Option<SecretValue>,
    pub model: String,
    pub api_version: String,
    pub timeout: Duration,
    pub default_temperature: Option<f32>,
    pub default_max_tokens: u32,
}

impl AnthropicConfig {
    /// Build from a descriptor and its resolved credential
    pub fn from_descriptor(descriptor: &ProviderDescriptor, api_key: Option<SecretValue>) -> Self {
        let settings = &descriptor.settings;
        Self {
            id: descriptor.id.clone(),
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| ANTHROPIC_DEFAULT_ENDPOINT.to_string()),
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| ANTHROPIC_DEFAULT_MODEL.to_string()),
            api_version: ANTHROPIC_API_VERSION.to_string(),
            timeout: descriptor
                .timeout()
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            default_temperature: settings.temperature,
            default_max_tokens: settings.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
        }
    }
}
