//! Directory-backed template store.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   octocat/
//!     plugin.yml
//!     plugin.star
//!   spaceghost/
//!     plugin.yml
//! ```

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

use crate::context::Context;
use crate::store::{StoreError, Template, TemplateStore};

/// Store that reads templates from `<root>/<namespace>/<name>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding one subdirectory per namespace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a template, or `None` if either segment could escape the root.
    fn template_path(&self, namespace: &str, name: &str) -> Option<PathBuf> {
        if !is_plain_segment(namespace) || !is_plain_segment(name) {
            return None;
        }
        Some(self.root.join(namespace).join(name))
    }
}

/// A single normal path component: no separators, no `.`/`..`, not empty.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == segment
    )
}

#[async_trait]
impl TemplateStore for FileStore {
    async fn find_name(
        &self,
        _ctx: &Context,
        name: &str,
        namespace: &str,
    ) -> Result<Template, StoreError> {
        let path = self
            .template_path(namespace, name)
            .ok_or_else(|| StoreError::not_found(name, namespace))?;

        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Template::new(namespace, name, data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::not_found(name, namespace))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn list(&self, _ctx: &Context, namespace: &str) -> Result<Vec<Template>, StoreError> {
        if !is_plain_segment(namespace) {
            return Ok(Vec::new());
        }
        let dir = self.root.join(namespace);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut templates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match tokio::fs::read_to_string(entry.path()).await {
                Ok(data) => templates.push(Template::new(namespace, name, data)),
                Err(e) => {
                    warn!(namespace, template = %name, error = %e, "skipping unreadable template")
                }
            }
        }

        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }
}
