//! In-memory template store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use kiln_core::{
    application::{
        ApplicationError,
        ports::{TemplateListing, TemplateOrigin, TemplateStore},
    },
    domain::TemplateKey,
    error::KilnResult,
};

use super::BuiltinStore;

/// Thread-safe in-memory template store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<TemplateKey, String>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with the built-in templates.
    pub fn with_builtin() -> KilnResult<Self> {
        let store = Self::new();
        let builtin = BuiltinStore::new();
        for key in builtin.keys() {
            store.insert(key, builtin.get(&key)?)?;
        }
        Ok(store)
    }

    /// Add or replace the source for `key`.
    pub fn insert(&self, key: TemplateKey, source: impl Into<String>) -> KilnResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(key, source.into());
        Ok(())
    }

    pub fn remove(&self, key: &TemplateKey) -> KilnResult<Option<String>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(key))
    }

    /// Get the number of templates.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, key: &TemplateKey) -> KilnResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(key).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> KilnResult<Vec<TemplateListing>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut listing: Vec<_> = inner
            .keys()
            .map(|key| TemplateListing {
                key: *key,
                origin: TemplateOrigin::Builtin,
            })
            .collect();
        listing.sort_by_key(|entry| entry.key.to_string());
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::domain::{ArtifactKind, all_template_keys};

    use super::*;

    #[test]
    fn insert_get_remove() {
        let store = InMemoryStore::new();
        let key = TemplateKey::new(ArtifactKind::Component, "component");
        assert!(store.is_empty());

        store.insert(key, "{{pascalName}}").unwrap();
        assert_eq!(store.get(&key).unwrap(), "{{pascalName}}");
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(&key).unwrap().as_deref(), Some("{{pascalName}}"));
        assert!(store.get(&key).is_err());
    }

    #[test]
    fn with_builtin_loads_every_key() {
        let store = InMemoryStore::with_builtin().unwrap();
        assert_eq!(store.len(), all_template_keys().len());

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|l| l.key.to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn clones_share_state() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        handle
            .insert(TemplateKey::new(ArtifactKind::Page, "index"), "x")
            .unwrap();
        assert_eq!(store.len(), 1);
    }
}
