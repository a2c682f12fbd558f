//! Command handlers.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use resume_core::theme::{presets, ColorRole};
use resume_core::{Editor, EditorConfig, FileStore, KvStore, ResumeData, Scene};
use resume_renderer::{ExportConfig, ExportFormat, PdfExporter, SceneExporter};
use tokio::time::MissedTickBehavior;

use crate::console::ConsoleFeedback;
use crate::error::StudioError;
use crate::{
    CliArgs, Command, HistoryCommand, OutputArgs, StudioConfig, StyleArgs, TemplateCommand,
};

/// Base name of exported image files.
const IMAGE_FILE_STEM: &str = "resume";

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if the command fails.
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = StudioConfig::from(&args);
    let feedback = match args.command {
        Command::History(HistoryCommand::Clear { yes: true }) => ConsoleFeedback::assume_yes(),
        _ => ConsoleFeedback::interactive(),
    };

    match args.command {
        Command::Init { force } => {
            init_data(&config.data_path, force)?;
            println!("Wrote sample resume to {}", config.data_path.display());
        }
        Command::Themes => {
            for theme in presets() {
                println!(
                    "{:<14}{:<14}background {}  text {}  font {}",
                    theme.id, theme.name, theme.colors.background, theme.colors.text_primary, theme.font
                );
            }
        }
        Command::Render { style, output } => {
            let mut editor = open_editor(&config, feedback)?;
            apply_style(&mut editor, &style)?;
            let path = export(&editor, &output).await?;
            editor.notify(&format!("Exported {}", path.display()));
        }
        Command::Template(command) => {
            let mut editor = open_editor(&config, feedback)?;
            run_template(&mut editor, command).await?;
        }
        Command::History(command) => {
            let mut editor = open_editor(&config, feedback)?;
            run_history(&mut editor, command).await?;
        }
        Command::Watch => {
            let mut editor = open_editor(&config, feedback)?;
            let saves = watch(
                &mut editor,
                &config.data_path,
                config.auto_save_interval,
                async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("Failed to listen for Ctrl-C: {e}");
                    }
                },
            )
            .await;
            tracing::info!("Stopped watching after {saves} auto-saves");
        }
    }
    Ok(())
}

async fn run_template<S: KvStore>(
    editor: &mut Editor<S>,
    command: TemplateCommand,
) -> anyhow::Result<()> {
    match command {
        TemplateCommand::Save { name } => {
            editor.set_template_name(name);
            let id = editor
                .save_template()?
                .ok_or(StudioError::BlankTemplateName)?;
            println!("{id}");
        }
        TemplateCommand::List => {
            for template in editor.layouts().templates() {
                println!("{}\t{}\t{}", template.id, template.name, template.created_at);
            }
        }
        TemplateCommand::Load { id, output } => {
            if !editor.load_template(id)? {
                return Err(StudioError::UnknownTemplate(id).into());
            }
            let path = export(editor, &output).await?;
            editor.notify(&format!("Exported {}", path.display()));
        }
        TemplateCommand::Delete { id } => {
            if !editor.delete_template(id)? {
                return Err(StudioError::UnknownTemplate(id).into());
            }
        }
    }
    Ok(())
}

async fn run_history<S: KvStore>(
    editor: &mut Editor<S>,
    command: HistoryCommand,
) -> anyhow::Result<()> {
    match command {
        HistoryCommand::List => {
            for version in editor.layouts().versions_newest_first() {
                println!("{}\t{}\t{}", version.id, version.timestamp, version.description);
            }
        }
        HistoryCommand::Restore { id, output } => {
            if !editor.restore_version(id)? {
                return Err(StudioError::UnknownVersion(id).into());
            }
            let path = export(editor, &output).await?;
            editor.notify(&format!("Exported {}", path.display()));
        }
        HistoryCommand::Clear { .. } => {
            editor.clear_version_history()?;
        }
    }
    Ok(())
}

/// Write the sample resume to `path`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is off, or the write fails.
pub fn init_data(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(StudioError::DataExists(path.to_path_buf()).into());
    }
    write_resume(path, &ResumeData::sample())
}

/// Read resume data from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_resume(path: &Path) -> anyhow::Result<ResumeData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading resume data from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Write resume data as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_resume(path: &Path, data: &ResumeData) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Open a file-backed editing session over the configured data file.
///
/// A missing data file falls back to the sample resume.
///
/// # Errors
///
/// Returns an error if the data file is malformed or the store cannot be opened.
pub fn open_editor(
    config: &StudioConfig,
    feedback: ConsoleFeedback,
) -> anyhow::Result<Editor<FileStore>> {
    let resume = if config.data_path.exists() {
        read_resume(&config.data_path)?
    } else {
        tracing::warn!(
            "{} not found, using the sample resume",
            config.data_path.display()
        );
        ResumeData::sample()
    };
    let store = FileStore::open(&config.store_dir)
        .with_context(|| format!("opening store {}", config.store_dir.display()))?;
    let editor_config = EditorConfig {
        grid: config.grid,
        ..EditorConfig::default()
    };
    Ok(Editor::new(editor_config, resume, store, feedback)?)
}

/// Apply theme, dark mode and custom style options in that order.
///
/// # Errors
///
/// Returns an error for an unknown preset.
pub fn apply_style<S: KvStore>(editor: &mut Editor<S>, style: &StyleArgs) -> anyhow::Result<()> {
    if let Some(id) = &style.theme {
        if !editor.apply_theme(id) {
            return Err(StudioError::UnknownTheme(id.clone()).into());
        }
    }
    if style.dark {
        editor.toggle_dark_mode();
    }
    if style.has_custom() {
        let themes = editor.themes_mut();
        if let Some(color) = &style.background {
            themes.set_custom_color(ColorRole::Background, color.as_str());
        }
        if let Some(color) = &style.text_color {
            themes.set_custom_color(ColorRole::TextPrimary, color.as_str());
        }
        if let Some(font) = &style.font {
            themes.set_custom_font(font.as_str());
        }
        editor.apply_custom_styles();
    }
    Ok(())
}

/// Export the editor's canvas on the blocking pool.
///
/// # Errors
///
/// Returns an error if there is no canvas or the export fails.
pub async fn export<S: KvStore>(editor: &Editor<S>, output: &OutputArgs) -> anyhow::Result<PathBuf> {
    let canvas = editor.canvas().ok_or(StudioError::NoCanvas)?;
    let scene = canvas.document().into_scene()?;
    let output = output.clone();
    tokio::task::spawn_blocking(move || write_output(&scene, &output)).await?
}

fn write_output(scene: &Scene, output: &OutputArgs) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(&output.out_dir)?;
    let options = output.pdf_options();
    let format = ExportFormat::from(output.format);
    if format == ExportFormat::Pdf {
        return Ok(PdfExporter::new(options).export_to(scene, &output.out_dir)?);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let jpeg_quality = (options.quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let exporter = SceneExporter::new(ExportConfig {
        scale: options.raster_scale(),
        jpeg_quality,
        ..ExportConfig::default()
    });
    let bytes = exporter.export(scene, format)?;
    let path = output
        .out_dir
        .join(format!("{IMAGE_FILE_STEM}.{}", format.extension()));
    std::fs::write(&path, bytes)?;
    tracing::info!("Exported {}", path.display());
    Ok(path)
}

/// Reload the data file and take an auto-save every `interval` until
/// `shutdown` resolves. Returns the number of versions saved.
///
/// A failed auto-save is logged and retried on the next tick.
pub async fn watch<S: KvStore>(
    editor: &mut Editor<S>,
    data_path: &Path,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> usize {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    tokio::pin!(shutdown);

    tracing::info!(
        "Watching {} and auto-saving every {:?}",
        data_path.display(),
        interval
    );
    let mut saves = 0;
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                match read_resume(data_path) {
                    Ok(data) if &data != editor.resume() => {
                        editor.update_resume(|resume| *resume = data);
                        tracing::info!("Reloaded {}", data_path.display());
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Keeping previous resume data: {e:#}"),
                }
                match editor.auto_save() {
                    Ok(Some(_)) => saves += 1,
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Auto-save failed: {e}"),
                }
            }
        }
    }
    saves
}
