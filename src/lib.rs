//! # ACAS Gateway
//!
//! Provider gateway for the ACAS coding assistant. Several LLM backends sit
//! behind one dispatch contract; the gateway tracks their health and usage
//! and routes each request to a concrete backend with retry and fallback.
//!
//! ## Features
//!
//! - **One contract**: OpenAI, LM Studio and Anthropic adapters plus custom
//!   implementations, all answering with the same envelope and error taxonomy
//! - **Failure isolation**: per-attempt timeouts, bounded exponential
//!   backoff and ordered fallback chains
//! - **Health probing**: concurrent connectivity tests with per-provider
//!   timeouts, on demand or periodically
//! - **Statistics**: lock-free per-provider counters with consistent snapshots
//!
//! ## Library use
//!
//! ```rust,no_run
//! use acas_gateway::core::ProviderHub;
//! use acas_gateway::core::providers::ProviderKind;
//! use acas_gateway::core::providers::secrets::EnvSecretResolver;
//! use acas_gateway::core::types::RequestEnvelope;
//! use acas_gateway::config::models::ProviderDescriptor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = ProviderHub::new(Arc::new(EnvSecretResolver))?;
//!     hub.register(
//!         ProviderDescriptor::new("leo", ProviderKind::LmStudio)
//!             .with_endpoint("http://localhost:1234"),
//!     )?;
//!
//!     let response = hub
//!         .dispatch("leo", &RequestEnvelope::new("Explain ownership in one sentence"))
//!         .await?;
//!     println!("{}: {}", response.provider_id, response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use acas_gateway::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

pub use config::Config;
pub use core::providers::{
    ErrorBody, ErrorKind, LLMProvider, Provider, ProviderError, ProviderKind, ProviderRegistry,
};
pub use core::types::{HealthProbeResult, RequestEnvelope, ResponseEnvelope};
pub use core::{ProviderHub, ProviderSummary, ReconfigureReport};
pub use utils::error::{GatewayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch when the build ran
    pub build_time: &'static str,
    /// Short git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
