//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::{Cli, Commands};
use crate::config::{discover_settings, load_settings, Settings};
use crate::error::Result;
use crate::store::FileStore;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
#[async_trait]
pub trait Command {
    /// Execute the command, writing user-facing output to `out`.
    async fn execute(&self, out: &mut (dyn Write + Send)) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Settings from `--settings`, or discovered under the project root.
    pub fn settings(&self, cli: &Cli) -> Result<Settings> {
        match &cli.settings {
            Some(path) => load_settings(path),
            None => discover_settings(&self.project_root),
        }
    }

    /// Template store from `--store`, falling back to the settings' store root.
    pub fn store(&self, cli: &Cli, settings: &Settings) -> Result<Arc<FileStore>> {
        let root = cli
            .store
            .clone()
            .or_else(|| settings.resolved_store_root(&self.project_root))
            .ok_or_else(|| {
                anyhow::anyhow!("no template store configured; pass --store or set store_root")
            })?;
        Ok(Arc::new(FileStore::new(root)))
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub async fn dispatch(&self, cli: &Cli, out: &mut (dyn Write + Send)) -> Result<CommandResult> {
        match &cli.command {
            Commands::Convert(args) => {
                let settings = self.settings(cli)?;
                let store = self.store(cli, &settings)?;
                let cmd = super::convert::ConvertCommand::new(
                    settings.build_converter(store),
                    settings.convert_timeout(),
                    args.clone(),
                );
                cmd.execute(out).await
            }
            Commands::Detect(args) => {
                let cmd = super::detect::DetectCommand::new(args.clone());
                cmd.execute(out).await
            }
            Commands::Templates(args) => {
                let settings = self.settings(cli)?;
                let store = self.store(cli, &settings)?;
                let cmd = super::templates::TemplatesCommand::new(store, args.clone());
                cmd.execute(out).await
            }
        }
    }
}
