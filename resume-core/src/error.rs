//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found in scene.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The drawing surface could not be constructed.
    #[error("Surface initialization failed: {0}")]
    SurfaceInit(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot parsed but could not be materialized into a scene.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A history cursor position outside the recorded commands.
    #[error("History index {index} out of range (len {len})")]
    HistoryOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of recorded commands.
        len: usize,
    },
}
