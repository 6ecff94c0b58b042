//! Fake provider for driving the hub without a network
//!
//! A [`FakeProvider`] replays a queue of outcomes, then keeps repeating its
//! steady behavior. It counts dispatches and probes so tests can check how
//! often the dispatcher and prober reached it.

use acas_gateway::core::providers::{LLMProvider, Provider, ProviderError};
use acas_gateway::core::types::{RequestEnvelope, ResponseEnvelope};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// What a fake does on one call
#[derive(Debug, Clone)]
pub enum Behavior {
    Reply(String),
    Fail(ProviderError),
    /// Never completes; only a timeout or cancellation ends the call
    Hang,
}

#[derive(Debug)]
pub struct FakeProvider {
    id: String,
    queued: Mutex<VecDeque<Behavior>>,
    steady: Behavior,
    probe: Behavior,
    delay: Duration,
    dispatches: AtomicU32,
    probes: AtomicU32,
}

impl FakeProvider {
    fn with_steady(id: &str, steady: Behavior) -> Self {
        Self {
            id: id.to_string(),
            queued: Mutex::new(VecDeque::new()),
            steady,
            probe: Behavior::Reply(String::new()),
            delay: Duration::ZERO,
            dispatches: AtomicU32::new(0),
            probes: AtomicU32::new(0),
        }
    }

    /// Always answers `content`
    pub fn replying(id: &str, content: &str) -> Self {
        Self::with_steady(id, Behavior::Reply(content.to_string()))
    }

    /// Always fails with `error`, probes included
    pub fn failing(id: &str, error: ProviderError) -> Self {
        let mut fake = Self::with_steady(id, Behavior::Fail(error.clone()));
        fake.probe = Behavior::Fail(error);
        fake
    }

    /// Never answers dispatches or probes
    pub fn hanging(id: &str) -> Self {
        let mut fake = Self::with_steady(id, Behavior::Hang);
        fake.probe = Behavior::Hang;
        fake
    }

    /// Fails `times` times with `error`, then answers `content`
    pub fn flaky(id: &str, times: usize, error: ProviderError, content: &str) -> Self {
        let fake = Self::replying(id, content);
        fake.queued
            .lock()
            .extend(std::iter::repeat_n(Behavior::Fail(error), times));
        fake
    }

    pub fn with_probe(mut self, probe: Behavior) -> Self {
        self.probe = probe;
        self
    }

    /// Sleep before every dispatch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn dispatches(&self) -> u32 {
        self.dispatches.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    /// Split into a handle for assertions and the registry-facing provider
    pub fn into_provider(self) -> (Arc<Self>, Provider) {
        let shared = Arc::new(self);
        (shared.clone(), Provider::Custom(shared))
    }

    fn next_behavior(&self) -> Behavior {
        self.queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.steady.clone())
    }
}

#[async_trait]
impl LLMProvider for FakeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn identify(&self) -> &str {
        "fake"
    }

    async fn test_connectivity(&self) -> Result<(), ProviderError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match self.probe.clone() {
            Behavior::Reply(_) => Ok(()),
            Behavior::Fail(error) => Err(error),
            Behavior::Hang => std::future::pending().await,
        }
    }

    async fn dispatch(&self, request: &RequestEnvelope) -> Result<ResponseEnvelope, ProviderError> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        let behavior = self.next_behavior();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match behavior {
            Behavior::Reply(content) => {
                Ok(ResponseEnvelope::new(&self.id, content).with_trace_id(&request.trace_id))
            }
            Behavior::Fail(error) => Err(error),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
