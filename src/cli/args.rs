//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pipeline-template - Render CI pipeline template envelopes.
#[derive(Debug, Parser)]
#[command(name = "pipeline-template")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides .pipeline-template/settings.yml)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Template store root directory (overrides settings)
    #[arg(long, global = true, env = "PIPELINE_TEMPLATE_STORE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a config document, printing it unchanged if it is not a template envelope
    Convert(ConvertCmdArgs),

    /// Report whether a config document is a template envelope
    Detect(DetectArgs),

    /// List stored templates in a namespace
    Templates(TemplatesArgs),
}

/// Arguments for the `convert` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConvertCmdArgs {
    /// Config document to convert
    pub file: PathBuf,

    /// Namespace the repository belongs to
    #[arg(short, long, env = "PIPELINE_TEMPLATE_NAMESPACE")]
    pub namespace: String,

    /// Repository name
    #[arg(long, default_value = "")]
    pub repo: String,

    /// Declared config filename (defaults to the file's name)
    #[arg(long, value_name = "NAME")]
    pub config_name: Option<String>,

    /// Build event forwarded to script engines
    #[arg(long, default_value = "")]
    pub event: String,

    /// Git ref forwarded to script engines
    #[arg(long = "ref", value_name = "REF", default_value = "")]
    pub git_ref: String,

    /// Build parameter forwarded to script engines (KEY=VALUE, repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Abort the conversion after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DetectArgs {
    /// Config document to inspect
    pub file: PathBuf,

    /// Declared config filename (defaults to the file's name)
    #[arg(long, value_name = "NAME")]
    pub config_name: Option<String>,
}

/// Arguments for the `templates` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TemplatesArgs {
    /// Namespace to list
    #[arg(short, long, env = "PIPELINE_TEMPLATE_NAMESPACE")]
    pub namespace: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert() {
        let cli = Cli::parse_from([
            "pipeline-template",
            "convert",
            ".drone.yml",
            "--namespace",
            "octocat",
            "--param",
            "a=b",
            "--param",
            "c=d=e",
        ]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.file, PathBuf::from(".drone.yml"));
                assert_eq!(args.namespace, "octocat");
                assert_eq!(
                    args.params,
                    vec![("a".into(), "b".into()), ("c".into(), "d=e".into())]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_param() {
        let result = Cli::try_parse_from([
            "pipeline-template",
            "convert",
            ".drone.yml",
            "-n",
            "octocat",
            "--param",
            "novalue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pipeline-template",
            "templates",
            "-n",
            "octocat",
            "--store",
            "/srv/templates",
            "--debug",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.store, Some(PathBuf::from("/srv/templates")));
    }

    #[test]
    fn parses_detect_config_name() {
        let cli = Cli::parse_from([
            "pipeline-template",
            "detect",
            "pipeline.txt",
            "--config-name",
            ".drone.yml",
        ]);
        match cli.command {
            Commands::Detect(args) => assert_eq!(args.config_name.as_deref(), Some(".drone.yml")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
