//! Plain substitution renderer.
//!
//! Templates use minijinja syntax: `{{ name }}` placeholders,
//! `{% if %}` conditionals and `{% for %}` loops, evaluated against the
//! envelope's `data` mapping.
//!
//! # Example
//!
//! ```
//! use pipeline_template::render::{render_yaml, TemplateData};
//! use pipeline_template::store::Template;
//!
//! let template = Template::new("octocat", "greet.yml", "message: hello {{ name }}\n");
//! let mut data = TemplateData::new();
//! data.insert("name".into(), "World".into());
//!
//! let out = render_yaml(&template, &data).unwrap();
//! assert_eq!(out, "message: hello World\n");
//! ```

use minijinja::{AutoEscape, Environment};

use crate::render::{RenderError, TemplateData};
use crate::store::Template;

/// Render a plain template against the substitution data.
///
/// Output is returned verbatim, including any trailing newline. Undefined
/// variables render as an empty string, not Go's `<no value>`.
pub fn render_yaml(template: &Template, data: &TemplateData) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let tmpl = env
        .template_from_named_str(&template.name, &template.data)
        .map_err(|source| RenderError::Compile {
            name: template.name.clone(),
            source,
        })?;

    tmpl.render(data).map_err(|source| RenderError::Execute {
        name: template.name.clone(),
        source,
    })
}
