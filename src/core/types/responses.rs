//! Response envelope types

use serde::{Deserialize, Serialize};

/// Token usage reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt token count
    pub prompt_tokens: u32,
    /// Completion token count
    pub completion_tokens: u32,
    /// Total token count
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build usage from prompt and completion counts
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Normalized completion returned by every adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Generated text
    pub content: String,
    /// Token usage, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Latency of the successful attempt in milliseconds
    pub latency_ms: u64,
    /// Id of the provider that served the request
    pub provider_id: String,
    /// Model reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Number of attempts made against the serving provider
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Trace id of the originating request
    #[serde(default)]
    pub trace_id: String,
}

fn default_attempts() -> u32 {
    1
}

impl ResponseEnvelope {
    /// Create a response served by `provider_id`
    pub fn new(provider_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
            latency_ms: 0,
            provider_id: provider_id.into(),
            model: None,
            attempts: 1,
            trace_id: String::new(),
        }
    }

    /// Set token usage (builder pattern)
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    /// Set the reported model (builder pattern)
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Set the trace id (builder pattern)
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}
