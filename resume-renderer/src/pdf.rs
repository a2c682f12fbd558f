//! Paginated PDF export.
//!
//! The surface is rasterized once, then placed on as many pages as
//! [`paginate`] asks for.

use std::path::{Path, PathBuf};

use printpdf::{ImageTransform, Mm, PdfDocument};
use resume_core::Surface;

use crate::error::{RenderError, RenderResult};
use crate::export::{ExportConfig, SceneExporter};
use crate::paginate::{paginate, PdfOptions};

/// File name every document export is written under.
pub const OUTPUT_FILE_NAME: &str = "resume.pdf";

/// Image resolution at which one pixel spans one millimetre.
const ONE_PIXEL_PER_MM: f32 = 25.4;

/// Document information dictionary entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Document title.
    pub title: String,
    /// Document subject.
    pub subject: String,
    /// Document author.
    pub author: String,
    /// Search keywords.
    pub keywords: Vec<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "My Resume".to_string(),
            subject: "Resume".to_string(),
            author: "Resume Generator".to_string(),
            keywords: ["resume", "cv", "curriculum vitae"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Renders a surface into a multi-page PDF.
#[derive(Debug)]
pub struct PdfExporter {
    options: PdfOptions,
    metadata: DocumentMetadata,
    raster: SceneExporter,
}

impl PdfExporter {
    /// Create an exporter for `options`.
    #[must_use]
    pub fn new(options: PdfOptions) -> Self {
        let raster = SceneExporter::new(ExportConfig {
            scale: options.raster_scale(),
            ..ExportConfig::default()
        });
        Self {
            options,
            metadata: DocumentMetadata::default(),
            raster,
        }
    }

    /// A4 portrait export at native resolution.
    #[must_use]
    pub fn quick() -> Self {
        Self::new(PdfOptions::quick())
    }

    /// Replace the document metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Page options in effect.
    #[must_use]
    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    /// Document metadata in effect.
    #[must_use]
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Render `surface` to PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization fails, the page options leave no
    /// printable area, or the document cannot be encoded.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self, surface: &dyn Surface) -> RenderResult<Vec<u8>> {
        let pixmap = self.raster.rasterize(surface)?;
        let (px_w, px_h) = (pixmap.width(), pixmap.height());
        let placements = paginate(px_w, px_h, &self.options)?;

        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
        // Decode with printpdf's bundled image crate for compatibility
        let decoded = printpdf::image_crate::load_from_memory(&png)
            .map_err(|e| RenderError::Pdf(format!("Failed to decode raster: {e}")))?;
        let raster = printpdf::image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());

        let (page_w, page_h) = self.options.page_dimensions_mm();
        let (doc, first_page, first_layer) = PdfDocument::new(
            self.metadata.title.clone(),
            Mm(page_w),
            Mm(page_h),
            "Layer 1",
        );
        let doc = doc
            .with_author(self.metadata.author.clone())
            .with_subject(self.metadata.subject.clone())
            .with_keywords(self.metadata.keywords.clone());

        for placement in &placements {
            let (page, layer) = if placement.page == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(page_w), Mm(page_h), "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            // PDF space grows upward from the bottom-left corner.
            let transform = ImageTransform {
                translate_x: Some(Mm(placement.x_mm)),
                translate_y: Some(Mm(page_h - placement.y_mm - placement.height_mm)),
                scale_x: Some(placement.width_mm / px_w as f32),
                scale_y: Some(placement.height_mm / px_h as f32),
                dpi: Some(ONE_PIXEL_PER_MM),
                ..Default::default()
            };
            printpdf::Image::from_dynamic_image(&raster).add_to_layer(layer, transform);
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("PDF save failed: {e}")))?;
        tracing::info!(
            "Rendered {} page(s) from a {px_w}x{px_h} raster ({} bytes)",
            placements.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Render `surface` and write it to [`OUTPUT_FILE_NAME`] inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or the file write fails.
    pub fn export_to(&self, surface: &dyn Surface, dir: &Path) -> RenderResult<PathBuf> {
        let bytes = self.render(surface)?;
        let path = dir.join(OUTPUT_FILE_NAME);
        std::fs::write(&path, bytes)?;
        tracing::info!("PDF exported to {}", path.display());
        Ok(path)
    }
}
