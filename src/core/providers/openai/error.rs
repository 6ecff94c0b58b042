//! OpenAI Error Handling
//!
//! Statuses follow the shared mapping, except a 429 whose error code is
//! `insufficient_quota`, which maps to a non-transient `AuthError`.

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::{ErrorMapper, default_http_mapping, extract_error_message};

/// Maps OpenAI-compatible error responses
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIErrorMapper;

impl OpenAIErrorMapper {
    fn error_code(body: &str) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.pointer("/error/code")
            .or_else(|| json.pointer("/error/type"))
            .and_then(|code| code.as_str())
            .map(str::to_string)
    }
}

impl ErrorMapper for OpenAIErrorMapper {
    fn map_http_error(
        &self,
        provider: &str,
        status: u16,
        body: &str,
        retry_after: Option<u64>,
    ) -> ProviderError {
        if status == 429 && Self::error_code(body).as_deref() == Some("insufficient_quota") {
            let message = extract_error_message(body)
                .unwrap_or_else(|| "insufficient quota".to_string());
            return ProviderError::authentication(provider, message);
        }
        default_http_mapping(provider, status, body, retry_after)
    }
}
