//! Template store capability.
//!
//! Templates are keyed by name within a namespace. The converter only ever
//! reads from a store; writes belong to the store's owners.
//!
//! - [`MemoryStore`] - thread-safe in-memory store
//! - [`FileStore`] - templates on disk under `<root>/<namespace>/<name>`
//!
//! # Example
//!
//! ```
//! use pipeline_template::context::Context;
//! use pipeline_template::store::{MemoryStore, Template, TemplateStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = MemoryStore::new();
//! store.create(Template::new("octocat", "greet.yml", "hello {{ name }}"));
//!
//! let template = store
//!     .find_name(&Context::background(), "greet.yml", "octocat")
//!     .await
//!     .unwrap();
//! assert_eq!(template.data, "hello {{ name }}");
//! # });
//! ```

pub mod fs;
pub mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::Context;

/// A stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Namespace the template belongs to.
    pub namespace: String,

    /// Template name, unique within its namespace (e.g. `plugin.yml`).
    pub name: String,

    /// Raw template source.
    pub data: String,
}

impl Template {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Failure reported by a template store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No template with this name exists in the namespace.
    #[error("no template named {name} in namespace {namespace}")]
    NotFound { name: String, namespace: String },

    /// IO failure while reading the backing storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure (connectivity, driver errors).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(name: &str, namespace: &str) -> Self {
        StoreError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }

    /// Whether this is the distinguished "no such template" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Namespaced, read-side access to stored templates.
///
/// Implementations should return promptly once `ctx` is cancelled; the
/// converter also wraps every call in [`Context::run`].
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Find a template by name within a namespace.
    async fn find_name(
        &self,
        ctx: &Context,
        name: &str,
        namespace: &str,
    ) -> Result<Template, StoreError>;

    /// List the templates in a namespace, sorted by name.
    async fn list(&self, ctx: &Context, namespace: &str) -> Result<Vec<Template>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguished() {
        assert!(StoreError::not_found("a.yml", "ns").is_not_found());
        assert!(!StoreError::Backend(anyhow::anyhow!("down")).is_not_found());
    }

    #[test]
    fn not_found_displays_name_and_namespace() {
        let msg = StoreError::not_found("a.yml", "octocat").to_string();
        assert!(msg.contains("a.yml"));
        assert!(msg.contains("octocat"));
    }
}
