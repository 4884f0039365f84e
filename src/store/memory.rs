//! In-memory template store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::context::Context;
use crate::store::{StoreError, Template, TemplateStore};

type Key = (String, String);

/// Thread-safe in-memory store keyed by `(namespace, name)`.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: Arc<RwLock<BTreeMap<Key, Template>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a list of templates.
    pub fn with_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let store = Self::new();
        for template in templates {
            store.create(template);
        }
        store
    }

    /// Insert or replace a template.
    pub fn create(&self, template: Template) {
        let key = (template.namespace.clone(), template.name.clone());
        self.write().insert(key, template);
    }

    /// Replace the source of an existing template.
    pub fn update(&self, namespace: &str, name: &str, data: &str) -> Result<(), StoreError> {
        let mut templates = self.write();
        let template = templates
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| StoreError::not_found(name, namespace))?;
        template.data = data.to_string();
        Ok(())
    }

    /// Remove a template. Returns the removed template, if any.
    pub fn delete(&self, namespace: &str, name: &str) -> Option<Template> {
        self.write()
            .remove(&(namespace.to_string(), name.to_string()))
    }

    /// Number of templates across all namespaces.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<Key, Template>> {
        // A poisoned lock only means a writer panicked mid-insert; the map is still usable.
        self.templates.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<Key, Template>> {
        self.templates.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn find_name(
        &self,
        _ctx: &Context,
        name: &str,
        namespace: &str,
    ) -> Result<Template, StoreError> {
        self.read()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(name, namespace))
    }

    async fn list(&self, _ctx: &Context, namespace: &str) -> Result<Vec<Template>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, template)| template.clone())
            .collect())
    }
}
