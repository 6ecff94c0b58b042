//! Integration tests for acas-gateway
//!
//! These tests drive the hub through its public API with fake providers,
//! and the HTTP adapters against a local mock server.

pub mod anthropic_adapter_tests;
pub mod dispatch_tests;
pub mod health_tests;
pub mod openai_adapter_tests;
pub mod stats_tests;
