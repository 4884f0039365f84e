//! Settings schema and loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::convert::TemplateConverter;
use crate::error::{ConvertError, Result};
use crate::render::CommandEngine;
use crate::store::TemplateStore;

/// Directory holding project settings.
pub const SETTINGS_DIR: &str = ".pipeline-template";

/// Settings filename inside [`SETTINGS_DIR`].
pub const SETTINGS_FILE: &str = "settings.yml";

/// Converter settings.
///
/// ```yaml
/// store_root: templates
/// lookup_timeout_secs: 5
/// engines:
///   jsonnet:
///     program: jsonnet
///     args: ["--ext-code", "input={input}", "-"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the directory-backed template store.
    /// Relative paths resolve against the project root.
    #[serde(default)]
    pub store_root: Option<PathBuf>,

    /// Upper bound for a single template lookup.
    #[serde(default)]
    pub lookup_timeout_secs: Option<u64>,

    /// Upper bound for a whole conversion.
    #[serde(default)]
    pub convert_timeout_secs: Option<u64>,

    /// External engines for script and data templates.
    #[serde(default)]
    pub engines: EngineSettings,
}

/// External engine commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Engine for `.star`, `.starlark` and `.script` templates.
    #[serde(default)]
    pub script: Option<CommandEngine>,

    /// Engine for `.jsonnet` templates.
    #[serde(default)]
    pub jsonnet: Option<CommandEngine>,
}

impl Settings {
    /// Store root resolved against `project_root`.
    pub fn resolved_store_root(&self, project_root: &Path) -> Option<PathBuf> {
        self.store_root.as_ref().map(|root| {
            if root.is_absolute() {
                root.clone()
            } else {
                project_root.join(root)
            }
        })
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_secs.map(Duration::from_secs)
    }

    pub fn convert_timeout(&self) -> Option<Duration> {
        self.convert_timeout_secs.map(Duration::from_secs)
    }

    /// Build a converter over `store` with the configured engines and timeouts.
    pub fn build_converter(&self, store: Arc<dyn TemplateStore>) -> TemplateConverter {
        let mut converter = TemplateConverter::new(store);
        if let Some(engine) = &self.engines.script {
            converter = converter.with_script_engine(Arc::new(engine.clone()));
        }
        if let Some(engine) = &self.engines.jsonnet {
            converter = converter.with_jsonnet_engine(Arc::new(engine.clone()));
        }
        if let Some(timeout) = self.lookup_timeout() {
            converter = converter.with_lookup_timeout(timeout);
        }
        converter
    }
}

/// Default settings path for a project root.
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Load a settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConvertError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConvertError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Parse YAML content into [`Settings`].
///
/// An empty document yields default settings.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| ConvertError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load settings from the project's default location, if present.
pub fn discover_settings(project_root: &Path) -> Result<Settings> {
    let path = settings_path(project_root);
    if path.exists() {
        load_settings(&path)
    } else {
        Ok(Settings::default())
    }
}
