//! External engine process adapter.
//!
//! Runs a configured program once per render. The template source is
//! written to the child's stdin and the rendered configuration is read
//! from its stdout. The conversion input is handed over as a JSON document:
//!
//! ```json
//! {
//!   "repo": { "namespace": "octocat", "name": "hello-world", "config": ".drone.yml" },
//!   "build": { "event": "push", "ref": "refs/heads/main", ... },
//!   "template": { "namespace": "octocat", "name": "plugin.jsonnet" },
//!   "input": { "name": "World" }
//! }
//! ```
//!
//! The document is exported as `PIPELINE_TEMPLATE_INPUT`, and any argument
//! equal to `{input}` is replaced with it. For example a jsonnet engine:
//!
//! ```yaml
//! program: jsonnet
//! args: ["--ext-code", "input={input}", "-"]
//! ```

use anyhow::{bail, Context as _};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::context::Context;
use crate::convert::args::ConvertArgs;
use crate::render::{JsonnetEngine, ScriptEngine, TemplateData};
use crate::store::Template;

/// Environment variable holding the JSON input document.
pub const INPUT_ENV_VAR: &str = "PIPELINE_TEMPLATE_INPUT";

/// Argument placeholder replaced by the JSON input document.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Engine backed by an external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEngine {
    /// Program to execute (looked up on PATH).
    pub program: String,

    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the child.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[derive(Serialize)]
struct TemplateRef<'a> {
    namespace: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct EngineInput<'a> {
    repo: &'a crate::convert::args::Repo,
    build: &'a crate::convert::args::Build,
    template: TemplateRef<'a>,
    input: &'a TemplateData,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Serialize the JSON input document for a render.
    fn input_document(
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String> {
        let input = EngineInput {
            repo: &args.repo,
            build: &args.build,
            template: TemplateRef {
                namespace: &template.namespace,
                name: &template.name,
            },
            input: data,
        };
        serde_json::to_string(&input).context("failed to encode engine input")
    }

    async fn execute(
        &self,
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String> {
        let input = Self::input_document(args, template, data)?;

        let mut cmd = Command::new(&self.program);
        for arg in &self.args {
            if arg == INPUT_PLACEHOLDER {
                cmd.arg(&input);
            } else {
                cmd.arg(arg);
            }
        }
        cmd.envs(&self.env)
            .env(INPUT_ENV_VAR, &input)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(program = %self.program, template = %template.name, "spawning engine");
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;

        let mut stdin = child.stdin.take().context("engine stdin unavailable")?;
        let source = template.data.as_bytes();
        let write = async move {
            let result = stdin.write_all(source).await;
            drop(stdin);
            result
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.with_context(|| format!("failed to wait for {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }
        // The engine may legitimately ignore stdin and exit before reading it.
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e).context("failed to write template to engine");
            }
        }

        String::from_utf8(output.stdout).context("engine output is not valid UTF-8")
    }
}

#[async_trait]
impl ScriptEngine for CommandEngine {
    async fn render(
        &self,
        _ctx: &Context,
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String> {
        self.execute(args, template, data).await
    }
}

#[async_trait]
impl JsonnetEngine for CommandEngine {
    async fn render(
        &self,
        _ctx: &Context,
        args: &ConvertArgs,
        template: &Template,
        data: &TemplateData,
    ) -> anyhow::Result<String> {
        self.execute(args, template, data).await
    }
}
