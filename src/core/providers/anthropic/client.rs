//! Anthropic wire format

use serde::Deserialize;
use serde_json::{Value, json};

use super::config::AnthropicConfig;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{RequestEnvelope, TokenUsage};

/// `POST /v1/messages` response
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Content extracted from a Messages response
#[derive(Debug, Clone, PartialEq)]
pub struct MessagesOutput {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

/// Build the Messages API request body
pub fn transform_messages_request(config: &AnthropicConfig, request: &RequestEnvelope) -> Value {
    let sampling = &request.sampling;
    let mut body = json!({
        "model": config.model,
        "max_tokens": sampling.max_tokens.unwrap_or(config.default_max_tokens),
        "messages": [{"role": "user", "content": request.prompt}],
    });

    if let Some(system_prompt) = &request.system_prompt {
        body["system"] = json!(system_prompt);
    }
    if let Some(temperature) = sampling.temperature.or(config.default_temperature) {
        body["temperature"] = json!(temperature);
    }
    if let Some(top_p) = sampling.top_p {
        body["top_p"] = json!(top_p);
    }
    if !sampling.stop.is_empty() {
        body["stop_sequences"] = json!(sampling.stop);
    }

    body
}

/// Concatenate the text blocks of a Messages response
pub fn transform_messages_response(
    provider: &str,
    response: MessagesResponse,
) -> Result<MessagesOutput, ProviderError> {
    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();

    if texts.is_empty() {
        return Err(ProviderError::malformed(provider, "response contained no text content"));
    }

    Ok(MessagesOutput {
        content: texts.concat(),
        usage: response
            .usage
            .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
        model: response.model,
    })
}
