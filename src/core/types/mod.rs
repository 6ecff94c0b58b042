//! Core type definitions
//!
//! Plain structured records that cross the dispatch boundary: the request
//! and response envelopes and the health probe result.

pub mod health;
pub mod requests;
pub mod responses;

pub use health::HealthProbeResult;
pub use requests::{RequestEnvelope, SamplingParams, ToolContext};
pub use responses::{ResponseEnvelope, TokenUsage};
