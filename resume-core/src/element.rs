//! Canvas elements - the visual primitives a resume scene is made of.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font weight for textual elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Text styling shared by the textual kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font family name.
    pub font_family: String,
    /// Fill color as hex.
    pub fill: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_weight: FontWeight::Normal,
            font_family: "Arial".to_string(),
            fill: "#333333".to_string(),
        }
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A wrapping, editable block of text with a fixed width.
    Textbox {
        /// Text content.
        content: String,
        /// Text styling.
        style: TextStyle,
        /// Whether the user may edit the text in place.
        editable: bool,
    },

    /// A single unwrapped run of text.
    Text {
        /// Text content.
        content: String,
        /// Text styling.
        style: TextStyle,
    },

    /// A straight line segment.
    Line {
        /// End point X, relative to the element origin.
        x2: f32,
        /// End point Y, relative to the element origin.
        y2: f32,
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in pixels.
        stroke_width: f32,
    },
}

impl ElementKind {
    /// Type tag of this kind, as used in snapshots.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Textbox { .. } => "textbox",
            Self::Text { .. } => "text",
            Self::Line { .. } => "line",
        }
    }

    /// Whether this kind carries text.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Textbox { .. } | Self::Text { .. })
    }

    /// Text style, for the textual kinds.
    #[must_use]
    pub fn text_style(&self) -> Option<&TextStyle> {
        match self {
            Self::Textbox { style, .. } | Self::Text { style, .. } => Some(style),
            Self::Line { .. } => None,
        }
    }

    /// Mutable text style, for the textual kinds.
    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match self {
            Self::Textbox { style, .. } | Self::Text { style, .. } => Some(style),
            Self::Line { .. } => None,
        }
    }

    /// Text content, for the textual kinds.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Textbox { content, .. } | Self::Text { content, .. } => Some(content),
            Self::Line { .. } => None,
        }
    }
}

/// Position and size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Transform {
    /// Transform at a position with the given size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Position and size.
    pub transform: Transform,
    /// Whether this element can be selected and dragged.
    pub interactive: bool,
    /// Guide elements (grid lines) are drawn but never persisted.
    #[serde(default)]
    pub guide: bool,
}

impl Element {
    /// Create a new element with the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            interactive: true,
            guide: false,
        }
    }

    /// Editable text box at a position with a fixed width.
    #[must_use]
    pub fn textbox(content: impl Into<String>, x: f32, y: f32, width: f32, style: TextStyle) -> Self {
        let content = content.into();
        let height = estimated_text_height(&content, style.font_size);
        Self::new(ElementKind::Textbox {
            content,
            style,
            editable: true,
        })
        .with_transform(Transform::new(x, y, width, height))
    }

    /// Single-run text at a position.
    #[must_use]
    pub fn text(content: impl Into<String>, x: f32, y: f32, style: TextStyle) -> Self {
        let content = content.into();
        let height = estimated_text_height(&content, style.font_size);
        #[allow(clippy::cast_precision_loss)]
        let width = content.chars().count() as f32 * style.font_size * 0.6;
        Self::new(ElementKind::Text { content, style })
            .with_transform(Transform::new(x, y, width, height))
    }

    /// Non-interactive guide line from `(x1, y1)` to `(x2, y2)`.
    #[must_use]
    pub fn guide_line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str) -> Self {
        Self {
            id: ElementId::new(),
            kind: ElementKind::Line {
                x2: x2 - x1,
                y2: y2 - y1,
                stroke: stroke.to_string(),
                stroke_width: 1.0,
            },
            transform: Transform::new(x1, y1, (x2 - x1).abs(), (y2 - y1).abs()),
            interactive: false,
            guide: true,
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set whether the element is interactive.
    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let t = &self.transform;
        x >= t.x && x <= t.x + t.width && y >= t.y && y <= t.y + t.height
    }
}

/// Line height multiplier used for text block sizing.
pub const LINE_HEIGHT: f32 = 1.16;

/// Height of a text block, one line per `\n`-separated row.
#[must_use]
pub fn estimated_text_height(content: &str, font_size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let lines = content.lines().count().max(1) as f32;
    lines * font_size * LINE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let text = Element::text("A", 0.0, 0.0, TextStyle::default());
        let line = Element::guide_line(0.0, 20.0, 800.0, 20.0, "#e0e0e0");
        assert_eq!(text.kind.type_name(), "text");
        assert_eq!(line.kind.type_name(), "line");
        assert!(text.kind.is_textual());
        assert!(!line.kind.is_textual());
    }

    #[test]
    fn test_guide_line_is_inert() {
        let line = Element::guide_line(40.0, 0.0, 40.0, 1131.0, "#e0e0e0");
        assert!(line.guide);
        assert!(!line.interactive);
        assert!((line.transform.height - 1131.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_text_height_counts_lines() {
        let one = estimated_text_height("single", 10.0);
        let three = estimated_text_height("a\nb\nc", 10.0);
        assert!((three - one * 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_id_parse_round_trip() {
        let id = ElementId::new();
        let parsed = ElementId::parse(&id.to_string()).expect("valid uuid");
        assert_eq!(id, parsed);
        assert!(ElementId::parse("not-a-uuid").is_err());
    }
}
