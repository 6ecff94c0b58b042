//! OpenAI Provider Implementation

use async_trait::async_trait;
use std::time::Instant;

use super::client::{ChatCompletionResponse, transform_chat_request, transform_chat_response};
use super::config::OpenAIConfig;
use super::error::OpenAIErrorMapper;
use crate::core::providers::base::{GlobalPoolManager, HttpMethod, api_url};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::LLMProvider;
use crate::core::types::{RequestEnvelope, ResponseEnvelope};

/// Adapter for OpenAI-compatible chat-completions servers
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    config: OpenAIConfig,
    pool_manager: GlobalPoolManager,
    mapper: OpenAIErrorMapper,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig, pool_manager: GlobalPoolManager) -> Self {
        Self {
            config,
            pool_manager,
            mapper: OpenAIErrorMapper,
        }
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Generate headers for API requests
    ///
    /// Fails with `Authentication` when a credential is required but absent.
    fn get_request_headers(&self) -> Result<Vec<(String, String)>, ProviderError> {
        let mut headers = Vec::with_capacity(1);
        match &self.config.api_key {
            Some(api_key) => headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", api_key.expose()),
            )),
            None if self.config.flavor.requires_credential() => {
                return Err(ProviderError::authentication(
                    &self.config.id,
                    "no credential configured",
                ));
            }
            None => {}
        }
        Ok(headers)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn identify(&self) -> &str {
        self.config.flavor.label()
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
        let url = api_url(&self.config.endpoint, "v1/chat/completions");
        let body = transform_chat_request(&self.config, request);

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

        let decoded: ChatCompletionResponse = response.json(&self.config.id, &self.mapper)?;
        let output = transform_chat_response(&self.config.id, decoded)?;

        let mut envelope = ResponseEnvelope::new(&self.config.id, output.content)
            .with_usage(output.usage)
            .with_model(output.model)
            .with_trace_id(&request.trace_id);
        envelope.latency_ms = started.elapsed().as_millis() as u64;
        Ok(envelope)
    }
}
