//! # Resume Studio
//!
//! Command-line host for the resume canvas: lays out resume data, applies
//! themes, exports documents, and manages templates and version history in
//! a local store directory.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod console;
pub mod error;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use resume_core::persistence::AUTO_SAVE_INTERVAL;
use resume_core::{GridSettings, LayoutId};
use resume_renderer::paginate::{MAX_QUALITY, MIN_QUALITY};
use resume_renderer::{ExportFormat, Orientation, PageSize, PdfOptions};

pub use commands::run;
pub use console::ConsoleFeedback;
pub use error::StudioError;

/// Command-line arguments for resume-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "resume-studio")]
#[command(about = "Canvas resume builder with templates, version history and PDF export")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding templates and version history
    #[arg(long, env = "RESUME_STORE_DIR", default_value = ".resume-studio")]
    pub store_dir: PathBuf,

    /// Resume data file (JSON)
    #[arg(long, env = "RESUME_DATA", default_value = "resume.json")]
    pub data: PathBuf,

    /// Do not draw the alignment grid
    #[arg(long)]
    pub no_grid: bool,

    /// Do not snap dragged objects to the grid
    #[arg(long)]
    pub no_snap: bool,

    /// Auto-save interval in milliseconds for `watch`
    #[arg(long, default_value_t = 5000)]
    pub auto_save_ms: u64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write sample resume data to the data file
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },

    /// Lay out the resume and export it
    Render {
        /// Style options
        #[command(flatten)]
        style: StyleArgs,
        /// Output options
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage named templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Manage the automatic version history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Rebuild from the data file and auto-save until interrupted
    Watch,

    /// List the theme presets
    Themes,
}

/// Template commands.
#[derive(Debug, Clone, Subcommand)]
pub enum TemplateCommand {
    /// Save the current layout under a name
    Save {
        /// Template name
        name: String,
    },
    /// List saved templates
    List,
    /// Load a template and export it
    Load {
        /// Template ID
        id: LayoutId,
        /// Output options
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Delete a template
    Delete {
        /// Template ID
        id: LayoutId,
    },
}

/// Version history commands.
#[derive(Debug, Clone, Subcommand)]
pub enum HistoryCommand {
    /// List versions, newest first
    List,
    /// Restore a version and export it
    Restore {
        /// Version ID
        id: LayoutId,
        /// Output options
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Delete every version
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Theme and custom style options.
#[derive(Debug, Clone, Default, Args)]
pub struct StyleArgs {
    /// Preset theme to apply
    #[arg(long)]
    pub theme: Option<String>,

    /// Toggle dark mode
    #[arg(long)]
    pub dark: bool,

    /// Custom background color
    #[arg(long)]
    pub background: Option<String>,

    /// Custom primary text color
    #[arg(long)]
    pub text_color: Option<String>,

    /// Custom font family
    #[arg(long)]
    pub font: Option<String>,
}

impl StyleArgs {
    /// Whether any custom style override was given.
    #[must_use]
    pub fn has_custom(&self) -> bool {
        self.background.is_some() || self.text_color.is_some() || self.font.is_some()
    }
}

/// Output format argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Paginated PDF
    #[default]
    Pdf,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// SVG document
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => Self::Pdf,
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Svg => Self::Svg,
        }
    }
}

/// Paper size argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PageSizeArg {
    /// 210 x 297 mm
    #[default]
    A4,
    /// 297 x 420 mm
    A3,
    /// 216 x 279 mm
    Letter,
    /// 216 x 356 mm
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => Self::A4,
            PageSizeArg::A3 => Self::A3,
            PageSizeArg::Letter => Self::Letter,
            PageSizeArg::Legal => Self::Legal,
        }
    }
}

/// Orientation argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    /// Taller than wide
    #[default]
    Portrait,
    /// Wider than tall
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

/// Export destination and page options.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    pub format: FormatArg,

    /// Directory the output file is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Paper size
    #[arg(long, value_enum, default_value_t = PageSizeArg::A4)]
    pub page_size: PageSizeArg,

    /// Paper orientation
    #[arg(long, value_enum, default_value_t = OrientationArg::Portrait)]
    pub orientation: OrientationArg,

    /// Margin in millimetres
    #[arg(long, default_value_t = 10.0)]
    pub margin: f32,

    /// Raster quality, 0.1 to 1.0
    #[arg(long, default_value_t = MAX_QUALITY, value_parser = parse_quality)]
    pub quality: f32,

    /// A4 portrait at native resolution, ignoring the page options
    #[arg(long)]
    pub quick: bool,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            format: FormatArg::Pdf,
            out_dir: PathBuf::from("."),
            page_size: PageSizeArg::A4,
            orientation: OrientationArg::Portrait,
            margin: 10.0,
            quality: MAX_QUALITY,
            quick: false,
        }
    }
}

impl OutputArgs {
    /// Page options these arguments select.
    #[must_use]
    pub fn pdf_options(&self) -> PdfOptions {
        if self.quick {
            return PdfOptions::quick();
        }
        PdfOptions {
            page_size: self.page_size.into(),
            orientation: self.orientation.into(),
            margin_mm: self.margin,
            quality: self.quality,
        }
    }
}

fn parse_quality(s: &str) -> Result<f32, String> {
    let quality: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        Ok(quality)
    } else {
        Err(format!("quality must be between {MIN_QUALITY} and {MAX_QUALITY}"))
    }
}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Template and version store directory.
    pub store_dir: PathBuf,
    /// Resume data file.
    pub data_path: PathBuf,
    /// Grid display and snapping.
    pub grid: GridSettings,
    /// Period between automatic version snapshots.
    pub auto_save_interval: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".resume-studio"),
            data_path: PathBuf::from("resume.json"),
            grid: GridSettings::default(),
            auto_save_interval: AUTO_SAVE_INTERVAL,
        }
    }
}

impl From<&CliArgs> for StudioConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            store_dir: args.store_dir.clone(),
            data_path: args.data.clone(),
            grid: GridSettings {
                show: !args.no_grid,
                snap: !args.no_snap,
                ..GridSettings::default()
            },
            auto_save_interval: Duration::from_millis(args.auto_save_ms.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["resume-studio", "themes"]).unwrap();
        let config = StudioConfig::from(&args);
        assert_eq!(config.auto_save_interval, AUTO_SAVE_INTERVAL);
        assert!(config.grid.show);
        assert!(config.grid.snap);
        assert!(matches!(args.command, Command::Themes));
    }

    #[test]
    fn test_grid_flags() {
        let args =
            CliArgs::try_parse_from(["resume-studio", "--no-grid", "--no-snap", "watch"]).unwrap();
        let config = StudioConfig::from(&args);
        assert!(!config.grid.show);
        assert!(!config.grid.snap);
    }

    #[test]
    fn test_render_options() {
        let args = CliArgs::try_parse_from([
            "resume-studio",
            "render",
            "--theme",
            "modern",
            "--page-size",
            "letter",
            "--orientation",
            "landscape",
            "--margin",
            "15",
            "--quality",
            "0.4",
        ])
        .unwrap();
        let Command::Render { style, output } = args.command else {
            panic!("expected render");
        };
        assert_eq!(style.theme.as_deref(), Some("modern"));
        assert!(!style.has_custom());
        let options = output.pdf_options();
        assert_eq!(options.page_size, PageSize::Letter);
        assert_eq!(options.orientation, Orientation::Landscape);
        assert!((options.margin_mm - 15.0).abs() < f32::EPSILON);
        assert!((options.quality - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_quick_ignores_page_options() {
        let args = CliArgs::try_parse_from([
            "resume-studio",
            "render",
            "--quick",
            "--page-size",
            "a3",
        ])
        .unwrap();
        let Command::Render { output, .. } = args.command else {
            panic!("expected render");
        };
        assert_eq!(output.pdf_options(), PdfOptions::quick());
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        assert!(CliArgs::try_parse_from(["resume-studio", "render", "--quality", "1.5"]).is_err());
        assert!(CliArgs::try_parse_from(["resume-studio", "render", "--quality", "0"]).is_err());
    }

    #[test]
    fn test_history_clear_yes() {
        let args = CliArgs::try_parse_from(["resume-studio", "history", "clear", "--yes"]).unwrap();
        assert!(matches!(
            args.command,
            Command::History(HistoryCommand::Clear { yes: true })
        ));
    }
}
