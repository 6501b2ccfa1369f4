//! Provider registry for resolving providers by identifier.

use std::collections::HashMap;
use std::sync::Arc;

use volbroker_common::{Error, Result};
use crate::provider::Provider;

/// Registry of constructed providers keyed by identifier.
///
/// Populated once at bootstrap through `&mut self`, then shared behind an
/// `Arc` for concurrent read-only lookups. Duplicate identifiers are
/// rejected; the first registration stays in place.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider.
    ///
    /// # Preconditions
    /// - `id` must be unique within the registry
    ///
    /// # Postconditions
    /// - Provider can be resolved by `id`
    ///
    /// # Errors
    /// - Returns `AlreadyExists` if `id` is already registered
    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn Provider>) -> Result<()> {
        let id = id.into();
        if self.providers.contains_key(&id) {
            return Err(Error::AlreadyExists(format!(
                "Provider '{}' is already registered",
                id
            )));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    /// Look up a provider by identifier.
    ///
    /// # Errors
    /// - `ProviderNotFound` if `id` is not registered
    pub fn get(&self, id: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ProviderNotFound(id.to_string()))
    }

    /// Get list of registered provider identifiers, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if a provider is registered.
    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
