//! Error types for the gateway

use crate::core::providers::unified_provider::ProviderError;
use crate::server::routes::{ApiError, ApiResponse};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Provider errors
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Invalid caller input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),
}

impl GatewayError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// The provider error, if this wraps one
    pub fn as_provider_error(&self) -> Option<&ProviderError> {
        match self {
            GatewayError::Provider(e) => Some(e),
            _ => None,
        }
    }

    /// Boundary error payload
    pub fn to_api_error(&self) -> ApiError {
        match self {
            GatewayError::Provider(e) => ApiError::from(e.to_body()),
            GatewayError::BadRequest(_) => ApiError::new("bad_request", self.to_string()),
            GatewayError::Config(_) | GatewayError::Yaml(_) => {
                ApiError::new("config_error", self.to_string())
            }
            _ => ApiError::new("internal_error", self.to_string()),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Provider(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_api_error()))
    }
}
