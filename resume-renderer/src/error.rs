//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Encoding the scene to an output format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The SVG intermediate could not be rasterized.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// The page options leave no room for content.
    #[error("Invalid page layout: {0}")]
    Layout(String),

    /// Building or saving the PDF document failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
