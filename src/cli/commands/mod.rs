//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and builds the shared settings and
//! template store they need.

pub mod convert;
pub mod detect;
pub mod dispatcher;
pub mod templates;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
