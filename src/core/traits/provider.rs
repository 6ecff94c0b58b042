//! Provider adapter contract

use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{RequestEnvelope, ResponseEnvelope};

/// Uniform wrapper around one backend
///
/// Implementations translate every backend failure into [`ProviderError`];
/// `dispatch` only ever fails with `Timeout`, `Authentication`, `RateLimit`,
/// `Backend` or `MalformedResponse`.
#[async_trait]
pub trait LLMProvider: Send + Sync + Debug {
    /// Registry id of this adapter instance
    fn id(&self) -> &str;

    /// Stable backend kind label, e.g. `"openai"`
    fn identify(&self) -> &str;

    /// Cheap reachability and credential check
    ///
    /// Must not touch stats; the caller bounds it with a timeout.
    async fn test_connectivity(&self) -> Result<(), ProviderError>;

    /// Issue one completion request against the backend
    async fn dispatch(&self, request: &RequestEnvelope) -> Result<ResponseEnvelope, ProviderError>;
}
