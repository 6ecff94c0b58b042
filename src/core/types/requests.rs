//! Request envelope types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generate a fresh trace id for a request
pub fn new_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sampling parameters forwarded to the backend
///
/// Every field is optional; unset fields fall back to the provider's
/// configured defaults and then to the backend's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Optional tool or plugin context attached to a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolContext {
    /// Name of the plugin issuing the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Tool definitions in OpenAI function format
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    /// Free-form metadata, never sent to the backend
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A single completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// User prompt text
    pub prompt: String,
    /// Optional system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingParams,
    /// Tool/plugin context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_context: Option<ToolContext>,
    /// Trace id carried through logs and echoed in the response
    #[serde(default = "new_trace_id")]
    pub trace_id: String,
}

impl RequestEnvelope {
    /// Create a request for a prompt with a fresh trace id
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            sampling: SamplingParams::default(),
            tool_context: None,
            trace_id: new_trace_id(),
        }
    }

    /// Set the system prompt (builder pattern)
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the sampling temperature (builder pattern)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.sampling.temperature = Some(temperature);
        self
    }

    /// Set the token limit (builder pattern)
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling.max_tokens = Some(max_tokens);
        self
    }

    /// Attach tool context (builder pattern)
    pub fn with_tool_context(mut self, tool_context: ToolContext) -> Self {
        self.tool_context = Some(tool_context);
        self
    }

    /// Override the trace id (builder pattern)
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Tools to forward to the backend, if any
    pub fn tools(&self) -> Option<&[serde_json::Value]> {
        self.tool_context
            .as_ref()
            .map(|ctx| ctx.tools.as_slice())
            .filter(|tools| !tools.is_empty())
    }
}
