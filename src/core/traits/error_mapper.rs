//! Error mapper trait
//!
//! Converts HTTP statuses, transport failures and undecodable bodies into
//! the fixed [`ProviderError`] taxonomy.

use crate::core::providers::unified_provider::ProviderError;

/// Per-adapter translation of backend failures
pub trait ErrorMapper: Send + Sync + 'static {
    /// Map a non-success HTTP response
    fn map_http_error(
        &self,
        provider: &str,
        status: u16,
        body: &str,
        retry_after: Option<u64>,
    ) -> ProviderError {
        default_http_mapping(provider, status, body, retry_after)
    }

    /// Map a failure that happened before a response arrived
    fn map_transport_error(&self, provider: &str, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout(provider, error.to_string())
        } else if error.is_decode() {
            ProviderError::malformed(provider, error.to_string())
        } else {
            ProviderError::backend(provider, format!("transport error: {}", error))
        }
    }

    /// Map a body that could not be decoded into the expected shape
    fn map_decode_error(&self, provider: &str, message: &str) -> ProviderError {
        ProviderError::malformed(provider, message)
    }
}

/// Status mapping shared by every HTTP adapter
pub fn default_http_mapping(
    provider: &str,
    status: u16,
    body: &str,
    retry_after: Option<u64>,
) -> ProviderError {
    let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
    match status {
        401 | 403 => ProviderError::authentication(provider, message),
        429 => ProviderError::rate_limit_with_message(provider, message, retry_after),
        408 => ProviderError::timeout(provider, message),
        _ => ProviderError::backend_status(provider, status, message),
    }
}

/// Pull a human-readable message out of a JSON error body
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; falls back to the trimmed raw body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let message = json
            .pointer("/error/message")
            .or_else(|| json.get("error").filter(|v| v.is_string()))
            .or_else(|| json.get("message"))
            .and_then(|v| v.as_str());
        if let Some(message) = message {
            return Some(message.to_string());
        }
    }

    Some(trimmed.chars().take(512).collect())
}

/// Parse a `retry-after` header value given in seconds
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.ceil() as u64)
}
