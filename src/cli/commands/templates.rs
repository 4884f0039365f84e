//! Templates command implementation.
//!
//! The `pipeline-template templates` command lists stored templates in a
//! namespace along with the renderer each would dispatch to.

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

use crate::cli::args::TemplatesArgs;
use crate::context::Context;
use crate::convert::TemplateFormat;
use crate::error::{ConvertError, Result};
use crate::store::TemplateStore;

use super::dispatcher::{Command, CommandResult};

/// The templates command implementation.
pub struct TemplatesCommand {
    store: Arc<dyn TemplateStore>,
    args: TemplatesArgs,
}

#[derive(Debug, Serialize)]
struct TemplateEntry {
    name: String,
    format: Option<&'static str>,
}

impl TemplatesCommand {
    /// Create a new templates command.
    pub fn new(store: Arc<dyn TemplateStore>, args: TemplatesArgs) -> Self {
        Self { store, args }
    }
}

#[async_trait]
impl Command for TemplatesCommand {
    async fn execute(&self, out: &mut (dyn Write + Send)) -> Result<CommandResult> {
        let templates = self
            .store
            .list(&Context::background(), &self.args.namespace)
            .await
            .map_err(ConvertError::Lookup)?;

        let entries: Vec<TemplateEntry> = templates
            .into_iter()
            .map(|t| TemplateEntry {
                format: TemplateFormat::for_template_name(&t.name).map(|f| f.as_str()),
                name: t.name,
            })
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
            return Ok(CommandResult::success());
        }

        if entries.is_empty() {
            writeln!(out, "No templates in namespace {}", self.args.namespace)?;
            return Ok(CommandResult::success());
        }

        for entry in &entries {
            writeln!(
                out,
                "{}\t{}",
                entry.name,
                entry.format.unwrap_or("unsupported")
            )?;
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Template};

    fn store() -> Arc<dyn TemplateStore> {
        Arc::new(MemoryStore::with_templates([
            Template::new("octocat", "plugin.yml", ""),
            Template::new("octocat", "plugin.jsonnet", ""),
            Template::new("octocat", "notes.txt", ""),
            Template::new("spaceghost", "other.star", ""),
        ]))
    }

    async fn run(namespace: &str, json: bool) -> String {
        let cmd = TemplatesCommand::new(
            store(),
            TemplatesArgs {
                namespace: namespace.into(),
                json,
            },
        );
        let mut out: Vec<u8> = Vec::new();
        cmd.execute(&mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn lists_namespace_with_formats() {
        let out = run("octocat", false).await;
        assert_eq!(
            out,
            "notes.txt\tunsupported\nplugin.jsonnet\tjsonnet\nplugin.yml\tyaml\n"
        );
    }

    #[tokio::test]
    async fn empty_namespace_message() {
        let out = run("nobody", false).await;
        assert!(out.contains("No templates in namespace nobody"));
    }

    #[tokio::test]
    async fn json_output() {
        let out = run("spaceghost", true).await;
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json[0]["name"], "other.star");
        assert_eq!(json[0]["format"], "starlark");
    }
}
