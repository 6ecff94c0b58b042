//! Unified Provider Error Handling
//!
//! Every adapter translates backend-specific failures into [`ProviderError`],
//! so callers of the dispatch path only ever see this fixed taxonomy.
//!
//! | Variant | Kind | HTTP Status | Transient |
//! |------|------|------------|--------|
//! | NotFound | `not_found` | 404 | No |
//! | DuplicateId | `duplicate_id` | 409 | No |
//! | Timeout | `timeout` | 504 | Yes |
//! | Authentication | `auth_error` | 401 | No |
//! | RateLimit | `rate_limited` | 429 | Yes |
//! | Backend | `backend_error` | 502 | Yes |
//! | MalformedResponse | `malformed_response` | 502 | No |
//! | ExhaustedRetries | `exhausted_retries` | 502 | No |
//! | AllProvidersFailed | `all_providers_failed` | 502 | No |
//! | Cancelled | `cancelled` | 408 | No |
//!
//! ```rust,ignore
//! let err = ProviderError::rate_limit("openai-main", Some(30));
//! assert!(err.is_transient());
//! assert_eq!(err.retry_after(), Some(30));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary-level error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    DuplicateId,
    Timeout,
    AuthError,
    RateLimited,
    BackendError,
    MalformedResponse,
    ExhaustedRetries,
    AllProvidersFailed,
    Cancelled,
}

impl ErrorKind {
    /// Whether a failure of this kind is retried locally
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::RateLimited | ErrorKind::BackendError
        )
    }

    /// HTTP status used when this kind crosses the HTTP boundary
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateId => 409,
            ErrorKind::AuthError => 401,
            ErrorKind::RateLimited => 429,
            ErrorKind::Timeout => 504,
            ErrorKind::Cancelled => 408,
            ErrorKind::BackendError
            | ErrorKind::MalformedResponse
            | ErrorKind::ExhaustedRetries
            | ErrorKind::AllProvidersFailed => 502,
        }
    }

    /// Stable snake_case label
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateId => "duplicate_id",
            ErrorKind::Timeout => "timeout",
            ErrorKind::AuthError => "auth_error",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::BackendError => "backend_error",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::ExhaustedRetries => "exhausted_retries",
            ErrorKind::AllProvidersFailed => "all_providers_failed",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider's terminal failure inside a fallback chain
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    /// Provider that failed
    pub provider_id: String,
    /// Its terminal error
    pub error: ProviderError,
}

impl ProviderFailure {
    /// Create a failure record
    pub fn new(provider_id: impl Into<String>, error: ProviderError) -> Self {
        Self {
            provider_id: provider_id.into(),
            error,
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.provider_id, self.error.kind(), self.error)
    }
}

fn summarize_failures(failures: &[ProviderFailure]) -> String {
    if failures.is_empty() {
        return "no providers were tried".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider '{provider}' not found or disabled")]
    NotFound { provider: String },

    #[error("Provider id '{provider}' is already registered")]
    DuplicateId { provider: String },

    #[error("Timeout for {provider}: {message}")]
    Timeout { provider: String, message: String },

    #[error("Authentication failed for {provider}: {message}")]
    Authentication { provider: String, message: String },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: String,
        message: String,
        /// Seconds the backend asked us to wait
        retry_after: Option<u64>,
    },

    #[error("Backend error from {provider}: {message}")]
    Backend {
        provider: String,
        message: String,
        /// HTTP status, when the failure came from a response
        status: Option<u16>,
    },

    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("Retries exhausted for {provider} after {attempts} attempt(s): {last}")]
    ExhaustedRetries {
        provider: String,
        attempts: u32,
        last: Box<ProviderError>,
    },

    #[error("All providers failed: {}", summarize_failures(.failures))]
    AllProvidersFailed { failures: Vec<ProviderFailure> },

    #[error("Dispatch to {provider} was cancelled")]
    Cancelled { provider: String },
}

impl ProviderError {
    /// Create not found error
    pub fn not_found(provider: impl Into<String>) -> Self {
        Self::NotFound {
            provider: provider.into(),
        }
    }

    /// Create duplicate id error
    pub fn duplicate_id(provider: impl Into<String>) -> Self {
        Self::DuplicateId {
            provider: provider.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create authentication error
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create rate limit error with a backend message
    pub fn rate_limit_with_message(
        provider: impl Into<String>,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: message.into(),
            retry_after,
        }
    }

    /// Create backend error
    pub fn backend(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            provider: provider.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create backend error carrying an HTTP status
    pub fn backend_status(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            provider: provider.into(),
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create malformed response error
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Wrap the last transient error once retries are used up
    pub fn exhausted(provider: impl Into<String>, attempts: u32, last: ProviderError) -> Self {
        Self::ExhaustedRetries {
            provider: provider.into(),
            attempts,
            last: Box::new(last),
        }
    }

    /// Create fallback chain failure
    pub fn all_failed(failures: Vec<ProviderFailure>) -> Self {
        Self::AllProvidersFailed { failures }
    }

    /// Create cancellation error
    pub fn cancelled(provider: impl Into<String>) -> Self {
        Self::Cancelled {
            provider: provider.into(),
        }
    }

    /// Taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateId { .. } => ErrorKind::DuplicateId,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Authentication { .. } => ErrorKind::AuthError,
            Self::RateLimit { .. } => ErrorKind::RateLimited,
            Self::Backend { .. } => ErrorKind::BackendError,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::ExhaustedRetries { .. } => ErrorKind::ExhaustedRetries,
            Self::AllProvidersFailed { .. } => ErrorKind::AllProvidersFailed,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Whether the dispatcher retries this error
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// Provider the error belongs to, if it is tied to one
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::NotFound { provider }
            | Self::DuplicateId { provider }
            | Self::Timeout { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Backend { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::ExhaustedRetries { provider, .. }
            | Self::Cancelled { provider } => Some(provider),
            Self::AllProvidersFailed { .. } => None,
        }
    }

    /// Backend-requested wait in seconds
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status for the boundary
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// Boundary shape: kind plus detail string
    pub fn to_body(&self) -> ErrorBody {
        let failures = match self {
            Self::AllProvidersFailed { failures } => failures
                .iter()
                .map(|failure| {
                    let mut body = failure.error.to_body();
                    body.provider_id = Some(failure.provider_id.clone());
                    body
                })
                .collect(),
            _ => Vec::new(),
        };

        ErrorBody {
            kind: self.kind(),
            detail: self.to_string(),
            provider_id: self.provider().map(str::to_string),
            failures,
        }
    }
}

/// Serializable error shape exposed at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Taxonomy kind
    pub kind: ErrorKind,
    /// Human-readable detail
    pub detail: String,
    /// Provider the error belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Ordered per-provider failures for `all_providers_failed`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ErrorBody>,
}

impl From<&ProviderError> for ErrorBody {
    fn from(error: &ProviderError) -> Self {
        error.to_body()
    }
}
