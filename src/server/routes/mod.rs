//! HTTP route modules
//!
//! Every handler answers with an [`ApiResponse`] envelope; failures carry an
//! [`ApiError`] whose `code` is the error kind.

pub mod dispatch;
pub mod health;
pub mod providers;
pub mod stats;

use crate::core::providers::ErrorBody;
use actix_web::web;
use serde::{Deserialize, Serialize};

/// Register every route on `cfg`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .service(
            web::scope("/api")
                .configure(providers::configure_routes)
                .configure(stats::configure_routes)
                .configure(dispatch::configure_routes),
        );
}

/// Error payload of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error kind, e.g. `not_found` or `all_providers_failed`
    pub code: String,
    /// Human-readable detail
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Ordered per-provider failures of a fallback chain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ErrorBody>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            provider_id: None,
            failures: Vec::new(),
        }
    }
}

impl From<ErrorBody> for ApiError {
    fn from(body: ErrorBody) -> Self {
        Self {
            code: body.kind.to_string(),
            message: body.detail,
            provider_id: body.provider_id,
            failures: body.failures,
        }
    }
}

/// Standard API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            meta: None,
        }
    }
}
