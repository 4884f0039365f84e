//! Conversion inputs and outputs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Repository that owns the config document being converted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Namespace (organization or account) templates are scoped to.
    pub namespace: String,

    /// Repository name.
    #[serde(default)]
    pub name: String,

    /// Declared config filename, e.g. `.drone.yml`.
    pub config: String,
}

impl Repo {
    /// Full `namespace/name` slug.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Raw, unconverted config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    /// Document text.
    pub data: String,
}

/// Build that triggered the conversion.
///
/// Forwarded untouched to the script and data-templating engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Triggering event, e.g. `push` or `pull_request`.
    #[serde(default)]
    pub event: String,
    /// Event action, e.g. `opened` for a pull request.
    #[serde(default)]
    pub action: String,
    /// Git reference being built.
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    /// Source branch.
    #[serde(default)]
    pub source: String,
    /// Target branch.
    #[serde(default)]
    pub target: String,
    /// Commit SHA before the change.
    #[serde(default)]
    pub before: String,
    /// Commit SHA after the change.
    #[serde(default)]
    pub after: String,
    /// Commit message.
    #[serde(default)]
    pub message: String,
    /// User who triggered the build.
    #[serde(default)]
    pub sender: String,
    /// Custom build parameters.
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Everything a converter needs for one conversion attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertArgs {
    /// Repository the config belongs to.
    pub repo: Repo,
    /// Raw config document as fetched from the repository.
    pub config: RawConfig,
    /// Build that triggered the conversion.
    #[serde(default)]
    pub build: Build,
}

impl ConvertArgs {
    /// Build args for a repository config file with the given contents.
    pub fn new(
        namespace: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            repo: Repo {
                namespace: namespace.into(),
                name: String::new(),
                config: filename.into(),
            },
            config: RawConfig { data: data.into() },
            build: Build::default(),
        }
    }

    /// Attach build context.
    pub fn with_build(mut self, build: Build) -> Self {
        self.build = build;
        self
    }
}

/// Rendered pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub data: String,
}
