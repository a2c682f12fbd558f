//! Fixed placement of resume content onto a scene.
//!
//! Positions are decided once per build from the data; nothing reflows when
//! objects are later moved or edited.

use crate::element::{estimated_text_height, FontWeight, TextStyle};
use crate::{Element, ResumeData, Scene};

/// Left edge of every content block.
pub const LEFT: f32 = 50.0;
/// Top of the personal info block.
pub const TOP: f32 = 50.0;
/// Width of the personal info block.
pub const PERSONAL_WIDTH: f32 = 350.0;
/// Font size of the personal info block.
pub const PERSONAL_FONT_SIZE: f32 = 24.0;
/// Horizontal position of the avatar glyph.
pub const AVATAR_LEFT: f32 = 500.0;
/// Font size of the avatar glyph.
pub const AVATAR_FONT_SIZE: f32 = 60.0;
/// Top of the summary heading.
pub const SUMMARY_TOP: f32 = 200.0;
/// Gap between a section heading and its body.
pub const HEADING_GAP: f32 = 30.0;
/// Gap between consecutive sections.
pub const SECTION_GAP: f32 = 30.0;
/// Width of body text blocks.
pub const BODY_WIDTH: f32 = 650.0;
/// Heading font size.
pub const HEADING_FONT_SIZE: f32 = 18.0;
/// Body font size.
pub const BODY_FONT_SIZE: f32 = 14.0;
/// Primary text color.
pub const PRIMARY_TEXT: &str = "#333333";
/// Secondary text color.
pub const SECONDARY_TEXT: &str = "#666666";

const ENTRY_GAP: f32 = 12.0;

fn heading_style() -> TextStyle {
    TextStyle {
        font_size: HEADING_FONT_SIZE,
        font_weight: FontWeight::Bold,
        fill: PRIMARY_TEXT.to_string(),
        ..TextStyle::default()
    }
}

fn body_style() -> TextStyle {
    TextStyle {
        font_size: BODY_FONT_SIZE,
        fill: SECONDARY_TEXT.to_string(),
        ..TextStyle::default()
    }
}

/// The four-line contact block: name, title, `email | phone`, location.
#[must_use]
pub fn personal_block_text(data: &ResumeData) -> String {
    let p = &data.personal;
    format!(
        "{}\n{}\n{} | {}\n{}",
        p.name, p.title, p.email, p.phone, p.location
    )
}

/// Clear `scene` and lay out `data` on it.
///
/// The grid is redrawn first when shown. Empty optional sections (avatar,
/// summary, experience, education, skills) are skipped.
pub fn populate_scene(scene: &mut Scene, data: &ResumeData) {
    scene.clear();
    if scene.grid.show {
        scene.draw_grid();
    }

    let personal_style = TextStyle {
        font_size: PERSONAL_FONT_SIZE,
        font_weight: FontWeight::Bold,
        fill: PRIMARY_TEXT.to_string(),
        ..TextStyle::default()
    };
    scene.add_element(Element::textbox(
        personal_block_text(data),
        LEFT,
        TOP,
        PERSONAL_WIDTH,
        personal_style,
    ));

    if !data.personal.avatar.is_empty() {
        let avatar_style = TextStyle {
            font_size: AVATAR_FONT_SIZE,
            font_weight: FontWeight::Bold,
            ..TextStyle::default()
        };
        scene.add_element(Element::text(
            data.personal.avatar.clone(),
            AVATAR_LEFT,
            TOP,
            avatar_style,
        ));
    }

    let mut y = SUMMARY_TOP;
    if !data.summary.is_empty() {
        y = add_section(scene, "Summary", std::iter::once(data.summary.clone()), y);
    }

    if !data.experience.is_empty() {
        let entries = data.experience.iter().map(|e| {
            format!(
                "{} - {} ({} - {})\n{}",
                e.company, e.position, e.start_date, e.end_date, e.description
            )
        });
        y = add_section(scene, "Experience", entries, y);
    }

    if !data.education.is_empty() {
        let entries = data.education.iter().map(|e| {
            format!(
                "{} - {}, {} ({})",
                e.school, e.degree, e.major, e.graduation_date
            )
        });
        y = add_section(scene, "Education", entries, y);
    }

    if !data.skills.is_empty() {
        let skills = data.skills.join("  ·  ");
        y = add_section(scene, "Skills", std::iter::once(skills), y);
    }

    tracing::debug!(
        "Laid out resume with {} objects, content ends at y={y}",
        scene.content_elements().count()
    );
}

/// Add a heading and one body block per entry starting at `top`.
/// Returns the top of the next section.
fn add_section(
    scene: &mut Scene,
    title: &str,
    entries: impl Iterator<Item = String>,
    top: f32,
) -> f32 {
    scene.add_element(Element::text(title, LEFT, top, heading_style()));
    let mut y = top + HEADING_GAP;
    for entry in entries {
        let height = estimated_text_height(&entry, BODY_FONT_SIZE);
        scene.add_element(Element::textbox(entry, LEFT, y, BODY_WIDTH, body_style()));
        y += height + ENTRY_GAP;
    }
    y - ENTRY_GAP + SECTION_GAP
}
