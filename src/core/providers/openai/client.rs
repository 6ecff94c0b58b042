//! OpenAI wire format
//!
//! Request/response transformation between the gateway envelopes and the
//! chat-completions JSON shape.

use serde::Deserialize;
use serde_json::{Value, json};

use super::config::OpenAIConfig;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{RequestEnvelope, TokenUsage};

/// `POST /v1/chat/completions` response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Content extracted from a completion
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutput {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

/// Build the chat-completions request body
pub fn transform_chat_request(config: &OpenAIConfig, request: &RequestEnvelope) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = &request.system_prompt {
        messages.push(json!({"role": "system", "content": system_prompt}));
    }
    messages.push(json!({"role": "user", "content": request.prompt}));

    let mut body = json!({
        "model": config.model,
        "messages": messages,
        "stream": false,
    });

    let sampling = &request.sampling;
    if let Some(temperature) = sampling.temperature.or(config.default_temperature) {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = sampling.max_tokens.or(config.default_max_tokens) {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(top_p) = sampling.top_p {
        body["top_p"] = json!(top_p);
    }
    if !sampling.stop.is_empty() {
        body["stop"] = json!(sampling.stop);
    }
    if let Some(tools) = request.tools() {
        body["tools"] = json!(tools);
    }

    body
}

/// Extract content and usage from a decoded completion
pub fn transform_chat_response(
    provider: &str,
    response: ChatCompletionResponse,
) -> Result<ChatOutput, ProviderError> {
    let usage = response
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

    let message = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .ok_or_else(|| ProviderError::malformed(provider, "response contained no choices"))?;

    let content = match (message.content, message.tool_calls) {
        (Some(content), _) => content,
        (None, Some(tool_calls)) => tool_calls.to_string(),
        (None, None) => {
            return Err(ProviderError::malformed(
                provider,
                "first choice has no message content",
            ));
        }
    };

    Ok(ChatOutput {
        content,
        usage,
        model: response.model,
    })
}
