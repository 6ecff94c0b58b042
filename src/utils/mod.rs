//! Utility modules for the gateway
//!
//! - **error**: gateway error type and `Result` alias
//! - **logging**: `tracing` subscriber setup

pub mod error;
pub mod logging;
