//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod dispatch;
pub mod gateway;
pub mod health;
pub mod logging;
pub mod provider;
pub mod server;

pub use dispatch::*;
pub use gateway::*;
pub use health::*;
pub use logging::*;
pub use provider::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

pub fn default_true() -> bool {
    true
}

/// Default per-call dispatch timeout in seconds
pub fn default_dispatch_timeout_secs() -> u64 {
    30
}

/// Default retry count after the first attempt
pub fn default_max_retries() -> u32 {
    2
}

pub fn default_max_retries_limit() -> u32 {
    10
}

pub fn default_max_timeout_secs() -> u64 {
    300
}

pub fn default_base_delay_ms() -> u64 {
    200
}

pub fn default_max_delay_ms() -> u64 {
    10_000
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_jitter() -> f64 {
    0.1
}

/// Default probe timeout in seconds
pub fn default_probe_timeout_secs() -> u64 {
    10
}

pub fn default_max_concurrent_probes() -> usize {
    8
}

pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default LM Studio endpoint
pub fn default_lm_studio_url() -> String {
    "http://localhost:1234".to_string()
}

/// Default model served by the local LM Studio instance
pub fn default_leo_model() -> String {
    "meta-llama-3.1-8b-instruct".to_string()
}
