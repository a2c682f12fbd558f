//! Top-level editing session: resume data, live canvas, history, layouts
//! and themes.

use std::sync::MutexGuard;

use crate::grid::GridSettings;
use crate::history::{Command, CommandLog, CommandRecorder};
use crate::layout::populate_scene;
use crate::persistence::{LayoutId, LayoutPersistence, LayoutResult};
use crate::scene::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::storage::KvStore;
use crate::theme::ThemeApplier;
use crate::{CanvasResult, Feedback, ResumeData, Scene, Surface};

/// Canvas construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Grid display and snapping.
    pub grid: GridSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            grid: GridSettings::default(),
        }
    }
}

/// An editing session.
///
/// If the canvas cannot be created the session still works, but every
/// canvas-dependent operation becomes a no-op.
pub struct Editor<S> {
    resume: ResumeData,
    canvas: Option<Scene>,
    history: CommandRecorder,
    layouts: LayoutPersistence<S>,
    themes: ThemeApplier,
    feedback: Box<dyn Feedback + Send>,
    template_name: String,
}

impl<S: KvStore> Editor<S> {
    /// Start a session over `store`, laying out `resume` on a fresh canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored layouts cannot be loaded. Canvas
    /// construction failures are logged, not returned.
    pub fn new(
        config: EditorConfig,
        resume: ResumeData,
        store: S,
        feedback: impl Feedback + Send + 'static,
    ) -> LayoutResult<Self> {
        let layouts = LayoutPersistence::open(store)?;
        let history = CommandRecorder::new();
        let canvas = match Scene::try_new(config.width, config.height) {
            Ok(mut scene) => {
                scene.grid = config.grid;
                history.attach(&mut scene);
                populate_scene(&mut scene, &resume);
                scene.render();
                Some(scene)
            }
            Err(e) => {
                tracing::error!("Error initializing canvas: {e}");
                None
            }
        };
        Ok(Self {
            resume,
            canvas,
            history,
            layouts,
            themes: ThemeApplier::new(),
            feedback: Box::new(feedback),
            template_name: String::new(),
        })
    }

    /// The live canvas, if one could be created.
    #[must_use]
    pub fn canvas(&self) -> Option<&Scene> {
        self.canvas.as_ref()
    }

    /// Mutable access to the live canvas.
    pub fn canvas_mut(&mut self) -> Option<&mut Scene> {
        self.canvas.as_mut()
    }

    /// Current resume data.
    #[must_use]
    pub fn resume(&self) -> &ResumeData {
        &self.resume
    }

    /// Edit the resume data and rebuild the canvas from it.
    pub fn update_resume(&mut self, edit: impl FnOnce(&mut ResumeData)) {
        edit(&mut self.resume);
        if let Some(canvas) = self.canvas.as_mut() {
            populate_scene(canvas, &self.resume);
            canvas.render();
        }
    }

    /// Lock the command history.
    pub fn history(&self) -> MutexGuard<'_, CommandLog> {
        self.history.log()
    }

    /// Observe every history change.
    pub fn set_history_observer(
        &self,
        observer: impl FnMut(&[Command], Option<usize>) + Send + 'static,
    ) {
        self.history.log().set_observer(observer);
    }

    /// Step back one history entry and show it on the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded snapshot cannot be applied.
    pub fn undo(&mut self) -> CanvasResult<bool> {
        self.step_history(CommandLog::undo)
    }

    /// Step forward one history entry and show it on the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded snapshot cannot be applied.
    pub fn redo(&mut self) -> CanvasResult<bool> {
        self.step_history(CommandLog::redo)
    }

    fn step_history(&mut self, step: fn(&mut CommandLog) -> Option<&str>) -> CanvasResult<bool> {
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(false);
        };
        let snapshot = {
            let mut log = self.history.log();
            match step(&mut *log) {
                Some(snapshot) => snapshot.to_string(),
                None => return Ok(false),
            }
        };
        canvas.restore_json(&snapshot)?;
        canvas.render();
        Ok(true)
    }

    /// Current template name input.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Set the template name input.
    pub fn set_template_name(&mut self, name: impl Into<String>) {
        self.template_name = name.into();
    }

    /// Save the canvas as a template named by the name input, then clear the input.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save_template(&mut self) -> LayoutResult<Option<LayoutId>> {
        let surface = self.canvas.as_ref().map(|s| s as &dyn Surface);
        let saved = self.layouts.save_as_template(surface, &self.template_name)?;
        if saved.is_some() {
            self.template_name.clear();
            self.feedback.notify("Template saved");
        }
        Ok(saved)
    }

    /// Load template `id` onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot is malformed.
    pub fn load_template(&mut self, id: LayoutId) -> LayoutResult<bool> {
        let surface = self.canvas.as_mut().map(|s| s as &mut dyn Surface);
        let loaded = self.layouts.load_template(surface, id)?;
        if loaded {
            self.feedback.notify("Template loaded");
        }
        Ok(loaded)
    }

    /// Delete template `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn delete_template(&mut self, id: LayoutId) -> LayoutResult<bool> {
        let deleted = self.layouts.delete_template(id)?;
        if deleted {
            self.feedback.notify("Template deleted");
        }
        Ok(deleted)
    }

    /// Take an automatic version snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn auto_save(&mut self) -> LayoutResult<Option<LayoutId>> {
        let surface = self.canvas.as_ref().map(|s| s as &dyn Surface);
        self.layouts.auto_save(surface)
    }

    /// Restore version `id` onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot is malformed.
    pub fn restore_version(&mut self, id: LayoutId) -> LayoutResult<bool> {
        let surface = self.canvas.as_mut().map(|s| s as &mut dyn Surface);
        let restored = self.layouts.restore_version(surface, id)?;
        if restored {
            self.feedback.notify("Version restored");
        }
        Ok(restored)
    }

    /// Clear the version history after asking the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub fn clear_version_history(&mut self) -> LayoutResult<bool> {
        let cleared = self
            .layouts
            .clear_version_history(self.feedback.as_ref())?;
        if cleared {
            self.feedback.notify("Version history cleared");
        }
        Ok(cleared)
    }

    /// Persisted templates and versions.
    #[must_use]
    pub fn layouts(&self) -> &LayoutPersistence<S> {
        &self.layouts
    }

    /// Apply preset theme `id`.
    pub fn apply_theme(&mut self, id: &str) -> bool {
        let surface = self.canvas.as_mut().map(|s| s as &mut dyn Surface);
        self.themes.apply_theme(surface, id)
    }

    /// Apply the custom palette.
    pub fn apply_custom_styles(&mut self) -> bool {
        let surface = self.canvas.as_mut().map(|s| s as &mut dyn Surface);
        self.themes.apply_custom_styles(surface)
    }

    /// Toggle dark mode, returning whether it is now on.
    pub fn toggle_dark_mode(&mut self) -> bool {
        let surface = self.canvas.as_mut().map(|s| s as &mut dyn Surface);
        self.themes.toggle_dark_mode(surface)
    }

    /// Theme selection and custom style state.
    #[must_use]
    pub fn themes(&self) -> &ThemeApplier {
        &self.themes
    }

    /// Mutable theme state, for editing custom styles.
    pub fn themes_mut(&mut self) -> &mut ThemeApplier {
        &mut self.themes
    }

    /// Send a message through the session's feedback channel.
    pub fn notify(&self, message: &str) {
        self.feedback.notify(message);
    }
}

impl<S> std::fmt::Debug for Editor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("canvas", &self.canvas)
            .field("history", &self.history)
            .field("themes", &self.themes)
            .field("template_name", &self.template_name)
            .finish_non_exhaustive()
    }
}
