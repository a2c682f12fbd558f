//! # Resume Studio Renderer
//!
//! Export of resume canvases to images and paginated documents.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────────┐   ┌──────────────┐
//! │ Surface  │──▶│   SVG    │──▶│ resvg raster   │──▶│ printpdf     │
//! │ objects  │   │ (text)   │   │ (tiny-skia)    │   │ pages        │
//! └──────────┘   └──────────┘   └────────────────┘   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod paginate;
pub mod pdf;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SceneExporter};
pub use paginate::{paginate, Orientation, PagePlacement, PageSize, PdfOptions};
pub use pdf::{DocumentMetadata, PdfExporter, OUTPUT_FILE_NAME};
