use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::ports::{GenerationProvider, LlmClientError};
use crate::domain::ProviderKind;

/// Constructed providers keyed by backend. Entries are never invalidated.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<ProviderKind, Arc<dyn GenerationProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn GenerationProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Returns the cached provider or builds one with `create`. Construction
    /// runs outside the lock; when two callers race, the first insert wins and
    /// both receive that instance.
    pub fn get_or_try_insert_with<F>(
        &self,
        kind: ProviderKind,
        create: F,
    ) -> Result<Arc<dyn GenerationProvider>, LlmClientError>
    where
        F: FnOnce() -> Result<Arc<dyn GenerationProvider>, LlmClientError>,
    {
        if let Some(provider) = self.get(kind) {
            return Ok(provider);
        }

        let created = create()?;
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(providers.entry(kind).or_insert(created)))
    }

    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
