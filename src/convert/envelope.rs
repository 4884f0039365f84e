//! Template argument envelope parsing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConvertError, Result};

/// Decoded template envelope.
///
/// ```yaml
/// kind: template
/// load: plugin.yml
/// data:
///   name: World
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateArgs {
    /// Envelope kind, always `template` once detection passed.
    #[serde(default)]
    pub kind: String,

    /// Name of the template to fetch, including its extension.
    #[serde(default)]
    pub load: String,

    /// Substitution data handed to the renderer.
    #[serde(default)]
    pub data: HashMap<String, serde_yaml::Value>,
}

/// Decode an envelope document into [`TemplateArgs`].
///
/// Only the first YAML document is read, so trailing documents such as a
/// `kind: signature` block are ignored. An empty or null document yields
/// default args.
///
/// # Errors
///
/// Returns `TemplateSyntax` if the document is not valid YAML or does not
/// have the envelope's shape.
pub fn parse_template_args(data: &str) -> Result<TemplateArgs> {
    let Some(document) = serde_yaml::Deserializer::from_str(data).next() else {
        return Ok(TemplateArgs::default());
    };
    Option::<TemplateArgs>::deserialize(document)
        .map(Option::unwrap_or_default)
        .map_err(|e| ConvertError::TemplateSyntax {
            message: e.to_string(),
        })
}
