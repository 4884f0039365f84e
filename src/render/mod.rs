//! Template renderers.
//!
//! Three independent strategies produce the final configuration text:
//!
//! - [`yaml`] - plain text templates with variable substitution (minijinja)
//! - [`ScriptEngine`] - sandboxed scripts (`.star`, `.starlark`, `.script`)
//! - [`JsonnetEngine`] - data templates (`.jsonnet`)
//!
//! The script and data-templating engines are external collaborators; this
//! module only forwards inputs to them under the request [`Context`] and
//! returns their output untouched. [`CommandEngine`] adapts an external
//! program to either trait.

pub mod command;
pub mod yaml;

pub use command::{CommandEngine, INPUT_ENV_VAR, INPUT_PLACEHOLDER};
pub use yaml::render_yaml;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::context::Context;
use crate::convert::args::ConvertArgs;
use crate::error::{ConvertError, Result};
use crate::store::Template;

/// Substitution data as decoded from the envelope.
pub type TemplateData = HashMap<String, serde_yaml::Value>;

/// Failure produced while rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The plain template failed to compile.
    #[error("failed to parse template {name}: {source}")]
    Compile {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The plain template failed while executing against the data.
    #[error("failed to execute template {name}: {source}")]
    Execute {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A delegated engine reported an error.
    #[error("{format} engine failed: {source}")]
    Engine {
        format: String,
        #[source]
        source: anyhow::Error,
    },

    /// No engine is configured for the template's format.
    #[error("no {format} engine configured")]
    EngineUnavailable { format: String },
}

/// Engine that evaluates sandboxed pipeline scripts.
///
/// Receives the raw substitution data; converting it into the script's own
/// value model is the engine's job.
#[async_trait]
pub trait ScriptEngine: Send + Sync {
    async fn render(
        &self,
        ctx: &Context,
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String>;
}

/// Engine that evaluates data templates (a JSON superset).
#[async_trait]
pub trait JsonnetEngine: Send + Sync {
    async fn render(
        &self,
        ctx: &Context,
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String>;
}

/// Render a script template with the configured engine.
pub async fn render_script(
    ctx: &Context,
    engine: Option<&dyn ScriptEngine>,
    args: &ConvertArgs,
    template: &Template,
    data: &TemplateData,
) -> Result<String> {
    let engine = engine.ok_or_else(|| RenderError::EngineUnavailable {
        format: "starlark".into(),
    })?;
    ctx.run(engine.render(ctx, args, template, data))
        .await?
        .map_err(|source| {
            ConvertError::Render(RenderError::Engine {
                format: "starlark".into(),
                source,
            })
        })
}

/// Render a data template with the configured engine.
pub async fn render_jsonnet(
    ctx: &Context,
    engine: Option<&dyn JsonnetEngine>,
    args: &ConvertArgs,
    template: &Template,
    data: &TemplateData,
) -> Result<String> {
    let engine = engine.ok_or_else(|| RenderError::EngineUnavailable {
        format: "jsonnet".into(),
    })?;
    ctx.run(engine.render(ctx, args, template, data))
        .await?
        .map_err(|source| {
            ConvertError::Render(RenderError::Engine {
                format: "jsonnet".into(),
                source,
            })
        })
}
