//! Preset palettes and custom styling applied to a surface.

use serde::{Deserialize, Serialize};

use crate::Surface;

/// Palette of a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    /// Canvas background.
    pub background: String,
    /// Main text color. Applied to every textual object.
    pub text_primary: String,
    /// Secondary text color.
    pub text_secondary: String,
    /// Accent color.
    pub accent: String,
}

/// A named style preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Palette.
    pub colors: ThemeColors,
    /// Font family.
    pub font: String,
    /// Section spacing in pixels.
    pub spacing: u32,
}

/// Preset applied when dark mode is turned on.
pub const DARK_THEME_ID: &str = "modern";
/// Preset applied when dark mode is turned off.
pub const LIGHT_THEME_ID: &str = "default";

/// Fallback background for custom styles.
pub const FALLBACK_BACKGROUND: &str = "#ffffff";
/// Fallback primary text color for custom styles.
pub const FALLBACK_TEXT_PRIMARY: &str = "#333333";
/// Fallback font for custom styles.
pub const FALLBACK_FONT: &str = "Arial";
/// Default section spacing.
pub const DEFAULT_SPACING: u32 = 20;

/// Fonts offered for custom styling.
pub const FONT_OPTIONS: [&str; 6] = [
    "Arial",
    "Helvetica",
    "Georgia",
    "Times New Roman",
    "Roboto",
    "Verdana",
];

fn preset(
    id: &str,
    name: &str,
    [background, text_primary, text_secondary, accent]: [&str; 4],
    font: &str,
    spacing: u32,
) -> Theme {
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        colors: ThemeColors {
            background: background.to_string(),
            text_primary: text_primary.to_string(),
            text_secondary: text_secondary.to_string(),
            accent: accent.to_string(),
        },
        font: font.to_string(),
        spacing,
    }
}

/// The built-in theme catalog.
#[must_use]
pub fn presets() -> Vec<Theme> {
    vec![
        preset(
            "default",
            "Default",
            ["#ffffff", "#333333", "#666666", "#3b82f6"],
            "Arial",
            20,
        ),
        preset(
            "professional",
            "Professional",
            ["#ffffff", "#1a1a1a", "#4a5568", "#2563eb"],
            "Helvetica",
            25,
        ),
        preset(
            "creative",
            "Creative",
            ["#fef6e4", "#001858", "#172c66", "#f3d2c1"],
            "Georgia",
            18,
        ),
        preset(
            "modern",
            "Modern",
            ["#0f172a", "#ffffff", "#cbd5e1", "#8b5cf6"],
            "Roboto",
            22,
        ),
        preset(
            "minimal",
            "Minimal",
            ["#ffffff", "#2d3748", "#718096", "#2b6cb0"],
            "Arial",
            28,
        ),
    ]
}

/// Look up a preset by id.
#[must_use]
pub fn find_preset(id: &str) -> Option<Theme> {
    presets().into_iter().find(|t| t.id == id)
}

/// Color slot of the custom palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    /// Canvas background.
    Background,
    /// Main text.
    TextPrimary,
    /// Secondary text.
    TextSecondary,
    /// Accent.
    Accent,
}

/// User-edited palette; unset slots fall back to fixed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomColors {
    /// Canvas background.
    pub background: Option<String>,
    /// Main text.
    pub text_primary: Option<String>,
    /// Secondary text.
    pub text_secondary: Option<String>,
    /// Accent.
    pub accent: Option<String>,
}

impl From<&ThemeColors> for CustomColors {
    fn from(colors: &ThemeColors) -> Self {
        Self {
            background: Some(colors.background.clone()),
            text_primary: Some(colors.text_primary.clone()),
            text_secondary: Some(colors.text_secondary.clone()),
            accent: Some(colors.accent.clone()),
        }
    }
}

/// Applies presets and custom styles, and tracks the selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeApplier {
    selected: String,
    dark_mode: bool,
    custom_colors: CustomColors,
    custom_font: String,
    custom_spacing: u32,
}

impl Default for ThemeApplier {
    fn default() -> Self {
        Self {
            selected: LIGHT_THEME_ID.to_string(),
            dark_mode: false,
            custom_colors: CustomColors::default(),
            custom_font: FALLBACK_FONT.to_string(),
            custom_spacing: DEFAULT_SPACING,
        }
    }
}

impl ThemeApplier {
    /// Create an applier with the default theme selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the preset `id` to `surface`.
    ///
    /// Sets the background, then gives every textual object the primary text
    /// color and the theme font. On success the custom baseline is reseeded
    /// from the theme. Returns `false` (and changes nothing) when there is no
    /// surface or no preset with that id.
    pub fn apply_theme(&mut self, surface: Option<&mut dyn Surface>, id: &str) -> bool {
        let (Some(surface), Some(theme)) = (surface, find_preset(id)) else {
            return false;
        };
        paint(surface, &theme.colors.background, &theme.colors.text_primary, &theme.font);
        tracing::info!("Applied theme {}", theme.id);

        self.selected = theme.id;
        self.custom_colors = CustomColors::from(&theme.colors);
        self.custom_font = theme.font;
        self.custom_spacing = theme.spacing;
        true
    }

    /// Apply the user-edited custom palette and font.
    ///
    /// Returns `false` when there is no surface.
    pub fn apply_custom_styles(&self, surface: Option<&mut dyn Surface>) -> bool {
        let Some(surface) = surface else {
            return false;
        };
        let background = self
            .custom_colors
            .background
            .as_deref()
            .unwrap_or(FALLBACK_BACKGROUND);
        let text = self
            .custom_colors
            .text_primary
            .as_deref()
            .unwrap_or(FALLBACK_TEXT_PRIMARY);
        let font = if self.custom_font.is_empty() {
            FALLBACK_FONT
        } else {
            &self.custom_font
        };
        paint(surface, background, text, font);
        tracing::info!("Applied custom styles");
        true
    }

    /// Flip dark mode and apply the matching preset.
    ///
    /// Returns whether dark mode is now on.
    pub fn toggle_dark_mode(&mut self, surface: Option<&mut dyn Surface>) -> bool {
        self.dark_mode = !self.dark_mode;
        let id = if self.dark_mode {
            DARK_THEME_ID
        } else {
            LIGHT_THEME_ID
        };
        self.apply_theme(surface, id);
        self.dark_mode
    }

    /// Override one slot of the custom palette.
    pub fn set_custom_color(&mut self, role: ColorRole, value: impl Into<String>) {
        let slot = match role {
            ColorRole::Background => &mut self.custom_colors.background,
            ColorRole::TextPrimary => &mut self.custom_colors.text_primary,
            ColorRole::TextSecondary => &mut self.custom_colors.text_secondary,
            ColorRole::Accent => &mut self.custom_colors.accent,
        };
        *slot = Some(value.into());
    }

    /// Set the custom font.
    pub fn set_custom_font(&mut self, font: impl Into<String>) {
        self.custom_font = font.into();
    }

    /// Set the custom spacing.
    pub fn set_custom_spacing(&mut self, spacing: u32) {
        self.custom_spacing = spacing;
    }

    /// Id of the last applied preset.
    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Whether dark mode is on.
    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Current custom palette.
    #[must_use]
    pub fn custom_colors(&self) -> &CustomColors {
        &self.custom_colors
    }

    /// Current custom font.
    #[must_use]
    pub fn custom_font(&self) -> &str {
        &self.custom_font
    }

    /// Current custom spacing.
    #[must_use]
    pub fn custom_spacing(&self) -> u32 {
        self.custom_spacing
    }
}

fn paint(surface: &mut dyn Surface, background: &str, text: &str, font: &str) {
    surface.set_background(background);
    for object in surface.objects_mut() {
        if let Some(style) = object.kind.text_style_mut() {
            style.fill = text.to_string();
            style.font_family = font.to_string();
        }
    }
    surface.render();
}
