//! Guide grid and snap-to-grid quantization.

use serde::{Deserialize, Serialize};

use crate::Element;

/// Grid spacing in canvas units.
pub const GRID_SIZE: f32 = 20.0;

/// Stroke color of guide lines.
pub const GRID_STROKE: &str = "#e0e0e0";

/// Grid display and snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Spacing between guide lines.
    pub size: f32,
    /// Whether guide lines are drawn.
    pub show: bool,
    /// Whether dragged objects snap to grid intersections.
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: GRID_SIZE,
            show: true,
            snap: true,
        }
    }
}

/// Quantize a coordinate to the nearest multiple of `size`.
///
/// Halves round away from zero, so snapping an already-snapped value is a no-op.
#[must_use]
pub fn snap_to_grid(value: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return value;
    }
    (value / size).round() * size
}

/// Guide lines spanning a `width` x `height` surface: horizontal rows first,
/// then vertical columns.
#[must_use]
pub fn grid_lines(width: f32, height: f32, size: f32) -> Vec<Element> {
    if size <= 0.0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut y = 0.0;
    while y < height {
        lines.push(Element::guide_line(0.0, y, width, y, GRID_STROKE));
        y += size;
    }
    let mut x = 0.0;
    while x < width {
        lines.push(Element::guide_line(x, 0.0, x, height, GRID_STROKE));
        x += size;
    }
    lines
}
