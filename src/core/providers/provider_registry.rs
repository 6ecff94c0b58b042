//! Provider Registry
//!
//! Holds configured adapters keyed by id. Lookups hand out `Arc`s and
//! release the lock immediately, so no request-path work ever runs under it.

use super::{LLMProvider, Provider, ProviderError};
use crate::config::models::provider::ProviderDescriptor;
use crate::core::providers::secrets::CredentialRef;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A descriptor together with the adapter built from it
#[derive(Debug, Clone)]
pub struct RegisteredProvider {
    pub descriptor: ProviderDescriptor,
    pub provider: Provider,
}

impl RegisteredProvider {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn is_enabled(&self) -> bool {
        self.descriptor.enabled
    }
}

/// Provider Registry keyed by provider id
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<BTreeMap<String, Arc<RegisteredProvider>>>,
}

impl ProviderRegistry {
    /// Create new provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; fails with `DuplicateId` if the id is taken
    pub fn register(
        &self,
        descriptor: ProviderDescriptor,
        provider: Provider,
    ) -> Result<(), ProviderError> {
        let mut providers = self.providers.write();
        if providers.contains_key(&descriptor.id) {
            return Err(ProviderError::duplicate_id(&descriptor.id));
        }

        tracing::info!(
            provider = %descriptor.id,
            kind = %descriptor.kind,
            enabled = descriptor.enabled,
            "registered provider"
        );
        providers.insert(
            descriptor.id.clone(),
            Arc::new(RegisteredProvider {
                descriptor,
                provider,
            }),
        );
        Ok(())
    }

    /// Remove a provider; reports whether it was present
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.providers.write().remove(id).is_some();
        if removed {
            tracing::info!(provider = id, "unregistered provider");
        }
        removed
    }

    /// Swap the descriptor and adapter of an existing provider
    pub fn replace(
        &self,
        descriptor: ProviderDescriptor,
        provider: Provider,
    ) -> Result<(), ProviderError> {
        let mut providers = self.providers.write();
        let slot = providers
            .get_mut(&descriptor.id)
            .ok_or_else(|| ProviderError::not_found(&descriptor.id))?;
        *slot = Arc::new(RegisteredProvider {
            descriptor,
            provider,
        });
        Ok(())
    }

    /// Look up a provider regardless of its enabled flag
    pub fn get(&self, id: &str) -> Result<Arc<RegisteredProvider>, ProviderError> {
        self.providers
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(id))
    }

    /// Look up a provider that may take traffic
    ///
    /// Disabled providers are reported as `NotFound`.
    pub fn get_enabled(&self, id: &str) -> Result<Arc<RegisteredProvider>, ProviderError> {
        let entry = self.get(id)?;
        if !entry.is_enabled() {
            return Err(ProviderError::not_found(id));
        }
        Ok(entry)
    }

    /// Descriptors ordered by id, optionally filtered by enabled flag
    pub fn list(&self, enabled: Option<bool>) -> Vec<ProviderDescriptor> {
        self.providers
            .read()
            .values()
            .filter(|entry| enabled.is_none_or(|flag| entry.is_enabled() == flag))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Snapshot of every enabled entry, ordered by id
    pub fn enabled_entries(&self) -> Vec<Arc<RegisteredProvider>> {
        self.providers
            .read()
            .values()
            .filter(|entry| entry.is_enabled())
            .cloned()
            .collect()
    }

    /// Toggle whether a provider takes traffic
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), ProviderError> {
        let mut providers = self.providers.write();
        let slot = providers
            .get_mut(id)
            .ok_or_else(|| ProviderError::not_found(id))?;
        if slot.descriptor.enabled != enabled {
            let mut updated = RegisteredProvider::clone(slot);
            updated.descriptor.enabled = enabled;
            *slot = Arc::new(updated);
            tracing::info!(provider = id, enabled, "provider enabled flag changed");
        }
        Ok(())
    }

    /// Descriptor of `id` with its credential reference replaced
    ///
    /// The caller rebuilds the adapter and stores it with [`Self::replace`].
    pub fn with_credential(
        &self,
        id: &str,
        credential: Option<CredentialRef>,
    ) -> Result<ProviderDescriptor, ProviderError> {
        let mut descriptor = self.get(id)?.descriptor.clone();
        descriptor.settings.credential = credential;
        Ok(descriptor)
    }

    /// Check if provider is registered
    pub fn contains(&self, id: &str) -> bool {
        self.providers.read().contains_key(id)
    }

    /// Registered ids in order
    pub fn ids(&self) -> Vec<String> {
        self.providers.read().keys().cloned().collect()
    }

    /// Get provider count
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers = self.providers.read();
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &providers
                    .values()
                    .map(|entry| (entry.id().to_string(), entry.provider.identify().to_string()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
