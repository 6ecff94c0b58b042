//! Anthropic Provider Implementation

use async_trait::async_trait;
use std::time::Instant;

use super::client::{MessagesResponse, transform_messages_request, transform_messages_response};
use super::config::AnthropicConfig;
use super::error::AnthropicErrorMapper;
use crate::core::providers::base::{GlobalPoolManager, HttpMethod, api_url};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::LLMProvider;
use crate::core::types::{RequestEnvelope, ResponseEnvelope};

/// Adapter for the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    config: AnthropicConfig,
    pool_manager: GlobalPoolManager,
    mapper: AnthropicErrorMapper,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig, pool_manager: GlobalPoolManager) -> Self {
        Self {
            config,
            pool_manager,
            mapper: AnthropicErrorMapper,
        }
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    // Anthropic uses x-api-key instead of a bearer token
    fn get_request_headers(&self) -> Result<Vec<(String, String)>, ProviderError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            ProviderError::authentication(&self.config.id, "no credential configured")
        })?;
        Ok(vec![
            ("x-api-key".to_string(), api_key.expose().to_string()),
            ("anthropic-version".to_string(), self.config.api_version.clone()),
        ])
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn identify(&self) -> &str {
        "anthropic"
    }

    async fn test_connectivity(&self) -> Result<(), ProviderError> {
        let headers = self.get_request_headers()?;
        let url = api_url(&self.config.endpoint, "v1/models");

        self.pool_manager
            .execute_request(
                &self.config.id,
                &self.mapper,
                &url,
                HttpMethod::GET,
                &headers,
                None,
                Some(self.config.timeout),
            )
            .await?;
        Ok(())
    }

    async fn dispatch(&self, request: &RequestEnvelope) -> Result<ResponseEnvelope, ProviderError> {
        let headers = self.get_request_headers()?;
        let url = api_url(&self.config.endpoint, "v1/messages");
        let body = transform_messages_request(&self.config, request);

        let started = Instant::now();
        let response = self
            .pool_manager
            .execute_request(
                &self.config.id,
                &self.mapper,
                &url,
                HttpMethod::POST,
                &headers,
                Some(&body),
                Some(self.config.timeout),
            )
            .await?;

        let decoded: MessagesResponse = response.json(&self.config.id, &self.mapper)?;
        let output = transform_messages_response(&self.config.id, decoded)?;

        let mut envelope = ResponseEnvelope::new(&self.config.id, output.content)
            .with_usage(output.usage)
            .with_model(output.model)
            .with_trace_id(&request.trace_id);
        envelope.latency_ms = started.elapsed().as_millis() as u64;
        Ok(envelope)
    }
}
