//! Host-level failures that the libraries report as plain no-ops.

use std::path::PathBuf;

use resume_core::LayoutId;
use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The canvas could not be created, so there is nothing to work on.
    #[error("Canvas is unavailable")]
    NoCanvas,

    /// No template with that ID.
    #[error("No template with id {0}")]
    UnknownTemplate(LayoutId),

    /// No version with that ID.
    #[error("No version with id {0}")]
    UnknownVersion(LayoutId),

    /// No preset with that ID.
    #[error("No theme named {0:?}")]
    UnknownTheme(String),

    /// A template name was required but blank.
    #[error("Template name must not be blank")]
    BlankTemplateName,

    /// Refusing to overwrite existing resume data.
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    DataExists(PathBuf),
}
