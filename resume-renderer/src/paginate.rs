//! Page geometry for multi-page document export.
//!
//! The whole raster is scaled to the printable width and drawn once per
//! page, shifted up by one page height each time. The viewer clips each
//! copy at the page edge, so consecutive pages show consecutive bands of
//! the image.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Lowest accepted export quality.
pub const MIN_QUALITY: f32 = 0.1;

/// Highest accepted export quality.
pub const MAX_QUALITY: f32 = 1.0;

/// Paper sizes, in millimetres, portrait orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 210 × 297 mm.
    #[default]
    A4,
    /// 297 × 420 mm.
    A3,
    /// 216 × 279 mm.
    Letter,
    /// 216 × 356 mm.
    Legal,
}

impl PageSize {
    /// Every supported paper size.
    pub const ALL: [Self; 4] = [Self::A4, Self::A3, Self::Letter, Self::Legal];

    /// Portrait `(width, height)` in millimetres.
    #[must_use]
    pub const fn dimensions_mm(self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::Letter => (216.0, 279.0),
            Self::Legal => (216.0, 356.0),
        }
    }

    /// Label shown in option lists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A4 => "A4 (210x297mm)",
            Self::A3 => "A3 (297x420mm)",
            Self::Letter => "Letter (216x279mm)",
            Self::Legal => "Legal (216x356mm)",
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

/// Document export options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Paper size.
    pub page_size: PageSize,
    /// Paper orientation.
    pub orientation: Orientation,
    /// Margin on every side, in millimetres.
    pub margin_mm: f32,
    /// Raster quality between 0.1 and 1.0.
    pub quality: f32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 10.0,
            quality: MAX_QUALITY,
        }
    }
}

impl PdfOptions {
    /// A4 portrait at native raster resolution.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            quality: 0.5,
            ..Self::default()
        }
    }

    /// Oriented page `(width, height)` in millimetres.
    #[must_use]
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Raster scale factor applied to the scene before embedding.
    #[must_use]
    pub fn raster_scale(&self) -> f32 {
        self.quality.clamp(MIN_QUALITY, MAX_QUALITY) * 2.0
    }
}

/// Where the raster goes on one page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    /// Zero-based page number.
    pub page: usize,
    /// Left edge of the image.
    pub x_mm: f32,
    /// Top edge of the image; negative once earlier pages have consumed it.
    pub y_mm: f32,
    /// Drawn image width.
    pub width_mm: f32,
    /// Drawn image height.
    pub height_mm: f32,
}

/// Lay out a `raster_width` × `raster_height` pixel image across pages.
///
/// The first page always exists. Another page follows while the image
/// height not yet covered by earlier pages is non-negative, so an image
/// exactly one page tall produces a second, empty page.
///
/// # Errors
///
/// Returns [`RenderError::Layout`] if the raster is empty or the margins
/// leave no printable width.
#[allow(clippy::cast_precision_loss)]
pub fn paginate(
    raster_width: u32,
    raster_height: u32,
    options: &PdfOptions,
) -> RenderResult<Vec<PagePlacement>> {
    if raster_width == 0 || raster_height == 0 {
        return Err(RenderError::Layout(format!(
            "empty raster {raster_width}x{raster_height}"
        )));
    }
    let (page_width, page_height) = options.page_dimensions_mm();
    let margin = options.margin_mm.max(0.0);
    let width = page_width - 2.0 * margin;
    if width <= 0.0 {
        return Err(RenderError::Layout(format!(
            "margin {margin}mm leaves no printable width on a {page_width}mm page"
        )));
    }
    let height = raster_height as f32 * width / raster_width as f32;

    let placement = |page: usize| PagePlacement {
        page,
        x_mm: margin,
        y_mm: margin - page as f32 * page_height,
        width_mm: width,
        height_mm: height,
    };

    let mut pages = vec![placement(0)];
    let mut remaining = height - page_height;
    while remaining >= 0.0 {
        pages.push(placement(pages.len()));
        remaining -= page_height;
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sizes() {
        assert_eq!(PageSize::A4.dimensions_mm(), (210.0, 297.0));
        assert_eq!(PageSize::A3.dimensions_mm(), (297.0, 420.0));
        assert_eq!(PageSize::Letter.dimensions_mm(), (216.0, 279.0));
        assert_eq!(PageSize::Legal.dimensions_mm(), (216.0, 356.0));
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let options = PdfOptions {
            orientation: Orientation::Landscape,
            ..PdfOptions::default()
        };
        assert_eq!(options.page_dimensions_mm(), (297.0, 210.0));
    }

    #[test]
    fn test_raster_scale_clamps_quality() {
        let mut options = PdfOptions::default();
        assert!((options.raster_scale() - 2.0).abs() < f32::EPSILON);
        options.quality = 0.0;
        assert!((options.raster_scale() - 0.2).abs() < 1e-6);
        options.quality = 5.0;
        assert!((options.raster_scale() - 2.0).abs() < f32::EPSILON);
        assert!((PdfOptions::quick().raster_scale() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resume_canvas_fits_one_a4_page() {
        let pages = paginate(800, 1131, &PdfOptions::default()).unwrap();
        assert_eq!(pages.len(), 1);
        let page = pages[0];
        assert!((page.x_mm - 10.0).abs() < f32::EPSILON);
        assert!((page.y_mm - 10.0).abs() < f32::EPSILON);
        assert!((page.width_mm - 190.0).abs() < f32::EPSILON);
        assert!((page.height_mm - 268.6125).abs() < 1e-3);
    }

    #[test]
    fn test_tall_raster_spills_onto_second_page() {
        let pages = paginate(800, 2000, &PdfOptions::default()).unwrap();
        assert_eq!(pages.len(), 2);
        assert!((pages[1].y_mm - (10.0 - 297.0)).abs() < 1e-3);
        assert_eq!(pages[1].height_mm, pages[0].height_mm);
    }

    #[test]
    fn test_exact_page_height_adds_trailing_page() {
        let options = PdfOptions {
            margin_mm: 0.0,
            ..PdfOptions::default()
        };
        let pages = paginate(210, 297, &options).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_scale_does_not_change_geometry() {
        let base = paginate(800, 1131, &PdfOptions::default()).unwrap();
        let doubled = paginate(1600, 2262, &PdfOptions::default()).unwrap();
        assert_eq!(base, doubled);
    }

    #[test]
    fn test_rejects_degenerate_layouts() {
        assert!(matches!(
            paginate(0, 100, &PdfOptions::default()),
            Err(RenderError::Layout(_))
        ));
        let options = PdfOptions {
            margin_mm: 105.0,
            ..PdfOptions::default()
        };
        assert!(matches!(
            paginate(800, 1131, &options),
            Err(RenderError::Layout(_))
        ));
    }
}
