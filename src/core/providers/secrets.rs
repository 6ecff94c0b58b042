//! Credential references and their resolution
//!
//! Descriptors only ever carry a [`CredentialRef`]; the secret itself is
//! looked up through a [`SecretResolver`] when the adapter is built.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reference to a secret, e.g. `env:OPENAI_API_KEY`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRef(String);

impl CredentialRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Environment variable named by this reference
    ///
    /// Both `env:NAME` and a bare `NAME` resolve to `NAME`.
    pub fn env_var(&self) -> &str {
        self.0.strip_prefix("env:").unwrap_or(&self.0).trim()
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CredentialRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Resolved secret; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the secret for use in a request header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

/// Resolves credential references to secret values
pub trait SecretResolver: Send + Sync + fmt::Debug {
    /// `None` when the reference cannot be resolved
    fn resolve(&self, reference: &CredentialRef) -> Option<SecretValue>;
}

/// Resolves references from process environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSecretResolver;

impl SecretResolver for EnvSecretResolver {
    fn resolve(&self, reference: &CredentialRef) -> Option<SecretValue> {
        let name = reference.env_var();
        if name.is_empty() {
            return None;
        }
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(SecretValue::new)
    }
}

/// In-memory resolver keyed by the raw reference string
#[derive(Default)]
pub struct StaticSecretResolver {
    secrets: RwLock<HashMap<String, SecretValue>>,
}

impl StaticSecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret (builder pattern)
    pub fn with_secret(self, reference: impl Into<String>, secret: impl Into<String>) -> Self {
        self.insert(reference, secret);
        self
    }

    /// Add or replace a secret
    pub fn insert(&self, reference: impl Into<String>, secret: impl Into<String>) {
        self.secrets
            .write()
            .insert(reference.into(), SecretValue::new(secret));
    }
}

impl fmt::Debug for StaticSecretResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecretResolver")
            .field("secret_count", &self.secrets.read().len())
            .finish()
    }
}

impl SecretResolver for StaticSecretResolver {
    fn resolve(&self, reference: &CredentialRef) -> Option<SecretValue> {
        self.secrets.read().get(reference.as_str()).cloned()
    }
}
