//! Router tests module


use crate::config::models::provider::ProviderDescriptor;
use crate::core::providers::ProviderKind;
use crate::core::providers::provider_registry::ProviderRegistry;
use crate::core::providers::testing::ScriptedProvider;
use crate::core::router::config::{DispatchOptions, RetryPolicy};
use crate::core::router::dispatcher::Dispatcher;
use crate::core::stats::StatsAggregator;
use std::sync::Arc;
use std::time::Duration;

/// Dispatcher over the given scripted providers, with no backoff waits
pub(super) fn create_dispatcher(
    providers: Vec<ScriptedProvider>,
) -> (Dispatcher, Arc<StatsAggregator>, Vec<Arc<ScriptedProvider>>) {
    let registry = Arc::new(ProviderRegistry::new());
    let stats = Arc::new(StatsAggregator::new());
    let mut handles = Vec::new();

    for scripted in providers {
        let id = crate::core::providers::LLMProvider::id(&scripted).to_string();
        let (handle, provider) = scripted.into_provider();
        stats.track(&id);
        registry
            .register(
                ProviderDescriptor::new(id, ProviderKind::Custom("scripted".to_string())),
                provider,
            )
            .unwrap();
        handles.push(handle);
    }

    let dispatcher = Dispatcher::new(
        registry,
        stats.clone(),
        RetryPolicy::immediate(),
        default_options(),
    );
    (dispatcher, stats, handles)
}

pub(super) fn default_options() -> DispatchOptions {
    DispatchOptions::new(Duration::from_secs(2), 2)
}
