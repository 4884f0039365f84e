//! Detect command implementation.
//!
//! The `pipeline-template detect` command reports whether a document is a
//! template envelope, and which template it loads. Exits 1 when it is not.

use async_trait::async_trait;
use std::io::Write;

use crate::cli::args::DetectArgs;
use crate::convert::{is_template_envelope, parse_template_args};
use crate::error::Result;

use super::convert::file_name;
use super::dispatcher::{Command, CommandResult};

/// The detect command implementation.
pub struct DetectCommand {
    args: DetectArgs,
}

impl DetectCommand {
    /// Create a new detect command.
    pub fn new(args: DetectArgs) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for DetectCommand {
    async fn execute(&self, out: &mut (dyn Write + Send)) -> Result<CommandResult> {
        let data = tokio::fs::read_to_string(&self.args.file).await?;
        let config_name = self
            .args
            .config_name
            .clone()
            .unwrap_or_else(|| file_name(&self.args.file));

        if !is_template_envelope(&config_name, &data) {
            writeln!(out, "not a template envelope")?;
            return Ok(CommandResult::failure(1));
        }

        let template_args = parse_template_args(&data)?;
        writeln!(out, "template envelope: load {}", template_args.load)?;
        Ok(CommandResult::success())
    }
}
