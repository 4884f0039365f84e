//! pipeline-template - Resolve CI pipeline template envelopes.
//!
//! A repository's pipeline config may be a *template envelope* instead of a
//! literal pipeline:
//!
//! ```yaml
//! kind: template
//! load: plugin.yml
//! data:
//!   name: World
//! ```
//!
//! This crate detects such envelopes, fetches the named template from the
//! repository's namespace, and renders it into the final configuration.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading
//! - [`context`] - Cancellation and deadlines for a conversion
//! - [`convert`] - Envelope detection, parsing, dispatch and the converter
//! - [`error`] - Error types and result aliases
//! - [`render`] - Plain, script and data-template renderers
//! - [`store`] - Template store capability and implementations
//!
//! # Example
//!
//! ```
//! use pipeline_template::convert::{is_template_envelope, parse_template_args};
//!
//! let doc = "kind: template\nload: plugin.yml\ndata:\n  name: World\n";
//! assert!(is_template_envelope(".drone.yml", doc));
//!
//! let args = parse_template_args(doc).unwrap();
//! assert_eq!(args.load, "plugin.yml");
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod render;
pub mod store;

pub use error::{ConvertError, Result};
