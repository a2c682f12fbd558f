//! Export of a fully laid-out resume.

use resume_core::{populate_scene, ResumeData, Scene, Surface, ThemeApplier};
use resume_renderer::{
    ExportFormat, PdfExporter, PdfOptions, SceneExporter, OUTPUT_FILE_NAME,
};
use tempfile::TempDir;

fn resume_scene() -> Scene {
    let mut scene = Scene::default();
    populate_scene(&mut scene, &ResumeData::sample());
    scene
}

#[test]
fn test_pdf_written_under_fixed_name() {
    let dir = TempDir::new().unwrap();
    let path = PdfExporter::quick()
        .export_to(&resume_scene(), dir.path())
        .expect("export");

    assert_eq!(path.file_name().unwrap(), OUTPUT_FILE_NAME);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..5], b"%PDF-");
}

#[test]
fn test_svg_contains_resume_text_but_no_grid() {
    let scene = resume_scene();
    assert!(scene.element_count() > scene.content_elements().count());

    let svg = SceneExporter::with_defaults().render_to_svg(&scene);
    assert!(svg.contains("Alex Chen"));
    assert!(svg.contains(">Summary</tspan>"));
    assert!(!svg.contains("#e0e0e0"));
}

#[test]
fn test_theme_colors_reach_the_export() {
    let mut scene = resume_scene();
    let mut themes = ThemeApplier::new();
    assert!(themes.apply_theme(Some(&mut scene as &mut dyn Surface), "creative"));

    let svg = SceneExporter::with_defaults().render_to_svg(&scene);
    assert!(svg.contains("fill=\"#fef6e4\""));
    assert!(svg.contains("fill=\"#001858\""));
    assert!(svg.contains("font-family=\"Georgia, sans-serif\""));
}

#[test]
fn test_high_quality_pdf_is_not_smaller_than_low_quality() {
    let scene = resume_scene();
    let low = PdfExporter::new(PdfOptions {
        quality: 0.1,
        ..PdfOptions::default()
    })
    .render(&scene)
    .unwrap();
    let high = PdfExporter::new(PdfOptions::default()).render(&scene).unwrap();
    assert!(high.len() >= low.len());
}

#[test]
fn test_png_matches_scene_size() {
    let png = SceneExporter::with_defaults()
        .export(&resume_scene(), ExportFormat::Png)
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 1131));
}
