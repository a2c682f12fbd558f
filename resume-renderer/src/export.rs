//! Scene export to image formats.
//!
//! Renders a [`Surface`] to PNG, JPEG or SVG using an SVG intermediate
//! representation and the resvg/tiny-skia rasterization pipeline. Guide
//! objects such as the snapping grid are never exported.

use std::fmt::Write;
use std::sync::Arc;

use image::ImageEncoder;
use resume_core::element::LINE_HEIGHT;
use resume_core::{Element, ElementKind, FontWeight, Surface, TextStyle};

use crate::error::{RenderError, RenderResult};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Paginated PDF document.
    Pdf,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }
}

/// Configuration for raster export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Scale factor applied to the surface size (e.g. 2.0 for print).
    pub scale: f32,
    /// Background override; `None` uses the surface background.
    pub background: Option<String>,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 85,
        }
    }
}

/// Exports a [`Surface`] to image formats.
pub struct SceneExporter {
    config: ExportConfig,
    fonts: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SceneExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneExporter")
            .field("config", &self.config)
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl SceneExporter {
    /// Create a new exporter, loading the system font database.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut fonts = usvg::fontdb::Database::new();
        fonts.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", fonts.len());
        Self {
            config,
            fonts: Arc::new(fonts),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a surface to a single image format.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be rendered or encoded, or if
    /// `format` is [`ExportFormat::Pdf`], which needs page options.
    pub fn export(&self, surface: &dyn Surface, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(surface),
            ExportFormat::Jpeg => self.render_to_jpeg(surface),
            ExportFormat::Svg => Ok(self.render_to_svg(surface).into_bytes()),
            ExportFormat::Pdf => Err(RenderError::Export(
                "PDF export goes through PdfExporter".to_string(),
            )),
        }
    }

    /// Export the surface to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, surface: &dyn Surface) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(surface)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the surface to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_jpeg(&self, surface: &dyn Surface) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(surface)?;
        let (width, height) = (pixmap.width(), pixmap.height());

        // The background rect is opaque, so dropping alpha loses nothing.
        let rgb_data: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect();

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the surface to an SVG string.
    #[must_use]
    pub fn render_to_svg(&self, surface: &dyn Surface) -> String {
        let (view_w, view_h) = surface.size();
        let (out_w, out_h) = self.output_dimensions(surface);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        let background = self
            .config
            .background
            .as_deref()
            .unwrap_or_else(|| surface.background());
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background),
        );

        for element in surface.list_objects().into_iter().filter(|e| !e.guide) {
            render_element_svg(&mut svg, element);
        }

        svg.push_str("</svg>");
        svg
    }

    /// Rasterize the surface at the configured scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the SVG intermediate cannot be parsed or the
    /// pixmap cannot be allocated.
    pub fn rasterize(&self, surface: &dyn Surface) -> RenderResult<tiny_skia::Pixmap> {
        let svg = self.render_to_svg(surface);
        self.rasterize_svg(&svg)
    }

    /// Output dimensions (width, height) in pixels.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn output_dimensions(&self, surface: &dyn Surface) -> (u32, u32) {
        let (w, h) = surface.size();
        let scale = self.config.scale.max(f32::MIN_POSITIVE);
        let out_w = (w.max(1.0) * scale).round() as u32;
        let out_h = (h.max(1.0) * scale).round() as u32;
        (out_w.max(1), out_h.max(1))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Rasterize(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Rasterize("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &Element) {
    let tf = &element.transform;

    match &element.kind {
        ElementKind::Textbox { content, style, .. } | ElementKind::Text { content, style } => {
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" {} xml:space=\"preserve\">",
                tf.x,
                tf.y + style.font_size,
                text_attributes(style),
            );
            let line_step = style.font_size * LINE_HEIGHT;
            for (i, line) in content.split('\n').enumerate() {
                let dy = if i == 0 { 0.0 } else { line_step };
                let _ = write!(
                    svg,
                    "<tspan x=\"{}\" dy=\"{dy}\">{}</tspan>",
                    tf.x,
                    escape_xml(line),
                );
            }
            svg.push_str("</text>");
        }

        ElementKind::Line {
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
                tf.x,
                tf.y,
                tf.x + x2,
                tf.y + y2,
                escape_xml(stroke),
            );
        }
    }
}

fn text_attributes(style: &TextStyle) -> String {
    let weight = match style.font_weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    format!(
        "font-size=\"{}\" font-family=\"{}, sans-serif\" font-weight=\"{weight}\" fill=\"{}\"",
        style.font_size,
        escape_xml(&style.font_family),
        escape_xml(&style.fill),
    )
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
