//! HTTP server core implementation

use crate::config::{Config, CorsConfig, ServerConfig};
use crate::core::ProviderHub;
use crate::core::providers::secrets::EnvSecretResolver;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a server around an existing hub
    pub fn new(config: Config, hub: Arc<ProviderHub>) -> Self {
        Self {
            config: config.gateway.server.clone(),
            state: AppState::new(config, hub),
        }
    }

    /// Build the CORS middleware from configuration
    pub fn cors(config: &CorsConfig) -> Cors {
        if !config.enabled {
            return Cors::default();
        }

        let mut cors = Cors::default()
            .allowed_methods(["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .max_age(config.max_age);

        if config.allows_all_origins() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        if config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Start the HTTP server and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || {
            let cors = Self::cors(&state.config.gateway.server.cors);
            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .wrap(TracingLogger::default())
                .wrap(DefaultHeaders::new().add(("Server", "acas-gateway")))
                .configure(routes::configure_routes)
        })
        .shutdown_timeout(self.config.shutdown_timeout_secs);

        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| GatewayError::server(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Build the hub from configuration, start background probing if enabled,
/// and serve HTTP until the server stops
pub async fn run_server(config: Config) -> Result<()> {
    config.validate()?;

    let hub = Arc::new(ProviderHub::from_config(
        &config.gateway,
        Arc::new(EnvSecretResolver),
    )?);

    let shutdown = CancellationToken::new();
    let monitor = config
        .health()
        .interval()
        .map(|interval| hub.spawn_health_monitor(interval, shutdown.clone()));

    let result = HttpServer::new(config, hub).start().await;

    shutdown.cancel();
    if let Some(monitor) = monitor {
        if let Err(e) = monitor.await {
            warn!("health monitor task failed: {}", e);
        }
    }
    result
}
