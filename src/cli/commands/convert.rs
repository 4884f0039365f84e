//! Convert command implementation.
//!
//! The `pipeline-template convert` command renders a template envelope.
//! Documents that are not envelopes are printed unchanged, mirroring how
//! the surrounding conversion pipeline falls through to the literal config.

use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::cli::args::ConvertCmdArgs;
use crate::context::Context;
use crate::convert::{Build, ConvertArgs, ConvertService, TemplateConverter};
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The convert command implementation.
pub struct ConvertCommand {
    converter: TemplateConverter,
    timeout: Option<Duration>,
    args: ConvertCmdArgs,
}

impl ConvertCommand {
    /// Create a new convert command.
    ///
    /// `--timeout-secs` takes precedence over `default_timeout`.
    pub fn new(
        converter: TemplateConverter,
        default_timeout: Option<Duration>,
        args: ConvertCmdArgs,
    ) -> Self {
        let timeout = args
            .timeout_secs
            .map(Duration::from_secs)
            .or(default_timeout);
        Self {
            converter,
            timeout,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConvertCmdArgs {
        &self.args
    }

    fn convert_args(&self, data: String) -> ConvertArgs {
        let config_name = self
            .args
            .config_name
            .clone()
            .unwrap_or_else(|| file_name(&self.args.file));

        let mut args = ConvertArgs::new(&self.args.namespace, config_name, data).with_build(Build {
            event: self.args.event.clone(),
            git_ref: self.args.git_ref.clone(),
            params: self.args.params.iter().cloned().collect(),
            ..Default::default()
        });
        args.repo.name = self.args.repo.clone();
        args
    }
}

/// Final path component as a string, or empty if there is none.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl Command for ConvertCommand {
    async fn execute(&self, out: &mut (dyn Write + Send)) -> Result<CommandResult> {
        let data = tokio::fs::read_to_string(&self.args.file).await?;
        let args = self.convert_args(data);

        let ctx = match self.timeout {
            Some(timeout) => Context::background().with_timeout(timeout),
            None => Context::background(),
        };

        match self.converter.convert(&ctx, &args).await? {
            Some(config) => out.write_all(config.data.as_bytes())?,
            None => {
                info!(
                    file = %self.args.file.display(),
                    "not a template envelope, printing unchanged"
                );
                out.write_all(args.config.data.as_bytes())?;
            }
        }
        out.flush()?;
        Ok(CommandResult::success())
    }
}
