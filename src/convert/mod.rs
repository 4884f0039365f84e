//! Template envelope conversion.
//!
//! A conversion runs strictly in order:
//!
//! 1. [`detect`] - is the document a template envelope at all?
//! 2. [`envelope`] - decode it into [`TemplateArgs`]
//! 3. lookup - fetch the named template from the namespace's store
//! 4. [`format`] - pick a renderer from the template's extension
//! 5. render - produce the final configuration text
//!
//! Steps 1 and 4 may pass through with `Ok(None)`, meaning "not mine, try
//! the next converter".
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pipeline_template::context::Context;
//! use pipeline_template::convert::{ConvertArgs, ConvertService, TemplateConverter};
//! use pipeline_template::store::{MemoryStore, Template};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = MemoryStore::with_templates([Template::new(
//!     "octocat",
//!     "greet.yml",
//!     "message: hello {{ name }}\n",
//! )]);
//! let converter = TemplateConverter::new(Arc::new(store));
//!
//! let args = ConvertArgs::new(
//!     "octocat",
//!     ".drone.yml",
//!     "kind: template\nload: greet.yml\ndata:\n  name: World\n",
//! );
//! let config = converter
//!     .convert(&Context::background(), &args)
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(config.data, "message: hello World\n");
//! # });
//! ```

pub mod args;
pub mod chain;
pub mod converter;
pub mod detect;
pub mod envelope;
pub mod format;

pub use args::{Build, Config, ConvertArgs, RawConfig, Repo};
pub use chain::ConverterChain;
pub use converter::TemplateConverter;
pub use detect::{is_template_envelope, TEMPLATE_FILE_RE};
pub use envelope::{parse_template_args, TemplateArgs};
pub use format::{extension, TemplateFormat};

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// A stage in the config conversion pipeline.
#[async_trait]
pub trait ConvertService: Send + Sync {
    /// Convert a config document.
    ///
    /// Returns `Ok(None)` when this converter does not apply.
    async fn convert(&self, ctx: &Context, args: &ConvertArgs) -> Result<Option<Config>>;
}
