//! Anthropic Error Handling
//!
//! Anthropic reports errors as `{"type": "error", "error": {"type": .., "message": ..}}`;
//! the inner type takes precedence over the HTTP status.

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::{ErrorMapper, default_http_mapping};

/// Status returned when the API is overloaded
pub const OVERLOADED_STATUS: u16 = 529;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicErrorMapper;

impl AnthropicErrorMapper {
    fn error_type_and_message(body: &str) -> Option<(String, String)> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        let error = json.get("error")?;
        let error_type = error.get("type")?.as_str()?.to_string();
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or(&error_type)
            .to_string();
        Some((error_type, message))
    }
}

impl ErrorMapper for AnthropicErrorMapper {
    fn map_http_error(
        &self,
        provider: &str,
        status: u16,
        body: &str,
        retry_after: Option<u64>,
    ) -> ProviderError {
        if let Some((error_type, message)) = Self::error_type_and_message(body) {
            match error_type.as_str() {
                "authentication_error" | "permission_error" => {
                    return ProviderError::authentication(provider, message);
                }
                "rate_limit_error" | "overloaded_error" => {
                    return ProviderError::rate_limit_with_message(provider, message, retry_after);
                }
                _ => {}
            }
        }

        if status == OVERLOADED_STATUS {
            return ProviderError::rate_limit_with_message(provider, "API overloaded", retry_after);
        }
        default_http_mapping(provider, status, body, retry_after)
    }
}
