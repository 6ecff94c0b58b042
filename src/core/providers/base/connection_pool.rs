use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::{ErrorMapper, parse_retry_after};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

/// Unified connection pool configuration
pub struct PoolConfig;
impl PoolConfig {
    /// Ceiling for any single request; per-call timeouts are tighter
    pub const TIMEOUT_SECS: u64 = 600;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const POOL_SIZE: usize = 32;
    pub const KEEPALIVE_SECS: u64 = 90;
}

/// Join a base endpoint and an API path such as `v1/models`
///
/// Tolerates trailing slashes and endpoints that already end in `/v1`.
pub fn api_url(endpoint: &str, path: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match path.strip_prefix("v1/") {
        Some(rest) if base.ends_with("/v1") => format!("{}/{}", base, rest),
        _ => format!("{}/{}", base, path),
    }
}

/// Successful HTTP exchange with the body already read
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON, mapping failures to `MalformedResponse`
    pub fn json<T: serde::de::DeserializeOwned>(
        &self,
        provider: &str,
        mapper: &dyn ErrorMapper,
    ) -> Result<T, ProviderError> {
        serde_json::from_str(&self.body).map_err(|e| {
            mapper.map_decode_error(provider, &format!("invalid response body: {}", e))
        })
    }
}

/// Shared reqwest client handed to every HTTP adapter
#[derive(Debug, Clone)]
pub struct GlobalPoolManager {
    client: Arc<Client>,
}

impl GlobalPoolManager {
    /// Create a new pool manager
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PoolConfig::TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(PoolConfig::CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(PoolConfig::KEEPALIVE_SECS))
            .pool_max_idle_per_host(PoolConfig::POOL_SIZE)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Execute an HTTP request and translate any failure through `mapper`
    ///
    /// Non-2xx responses become the mapper's error for that status; the
    /// body is read in full before returning.
    #[allow(clippy::too_many_arguments)]
    pub async fn execute_request(
        &self,
        provider: &str,
        mapper: &dyn ErrorMapper,
        url: &str,
        method: HttpMethod,
        headers: &[(String, String)],
        body: Option<&serde_json::Value>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, ProviderError> {
        let mut request_builder = match method {
            HttpMethod::GET => self.client.get(url),
            HttpMethod::POST => self.client.post(url),
        };

        for (key, value) in headers {
            request_builder = request_builder.header(key.as_str(), value.as_str());
        }

        if let Some(body_data) = body {
            request_builder = request_builder.json(body_data);
        }

        if let Some(timeout) = timeout {
            request_builder = request_builder.timeout(timeout);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| mapper.map_transport_error(provider, &e))?;

        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| mapper.map_transport_error(provider, &e))?;

        if !(200..300).contains(&status) {
            tracing::debug!(provider, status, "backend returned error status");
            return Err(mapper.map_http_error(provider, status, &body, retry_after));
        }

        Ok(HttpResponse { status, body })
    }

    /// Get the underlying client for direct use
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Default for GlobalPoolManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::error!(
                "Failed to create GlobalPoolManager: {}, using minimal client",
                e
            );
            Self {
                client: Arc::new(Client::new()),
            }
        })
    }
}
