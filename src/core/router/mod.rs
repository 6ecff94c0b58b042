//! Request dispatch with retry and fallback
//!
//! ## Module Structure
//!
//! - `config` - Retry policy, per-call dispatch options and their limits
//! - `execution` - Transient classification, backoff and the attempt state machine
//! - `dispatcher` - Single-provider dispatch and ordered fallback chains

pub mod config;
pub mod dispatcher;
pub mod execution;

#[cfg(test)]
mod tests;

pub use config::{DispatchLimits, DispatchOptions, RetryPolicy};
pub use dispatcher::Dispatcher;
pub use execution::{AttemptState, calculate_retry_delay, is_transient};
