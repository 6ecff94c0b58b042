//! Anthropic Messages API provider

pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use config::AnthropicConfig;
pub use error::AnthropicErrorMapper;
pub use provider::AnthropicProvider;
