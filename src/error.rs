//! Error types for template conversion.
//!
//! This module defines [`ConvertError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Envelope and lookup failures that users can act on get their own variants
//!   ([`ConvertError::TemplateSyntax`], [`ConvertError::TemplateNotFound`])
//! - Store and renderer failures are carried opaquely in
//!   [`ConvertError::Lookup`] and [`ConvertError::Render`]
//! - Use `anyhow::Error` (via `ConvertError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::render::RenderError;
use crate::store::StoreError;

/// Core error type for template conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The envelope could not be decoded as YAML.
    #[error("template converter: there is a problem with the yaml file provided: {message}")]
    TemplateSyntax { message: String },

    /// The envelope names a template that does not exist in the namespace.
    #[error("template converter: template name given not found: {name} (namespace {namespace})")]
    TemplateNotFound { name: String, namespace: String },

    /// The template store failed for a reason other than a missing template.
    #[error("template lookup failed: {0}")]
    Lookup(#[source] StoreError),

    /// A renderer failed to compile, execute or evaluate the template.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The request was cancelled while waiting on the store or an engine.
    #[error("conversion cancelled")]
    Cancelled,

    /// The request deadline passed while waiting on the store or an engine.
    #[error("conversion deadline exceeded")]
    DeadlineExceeded,

    /// Settings file not found at expected location.
    #[error("Settings not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse settings file.
    #[error("Failed to parse settings at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
