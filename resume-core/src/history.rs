//! Linear command history recorded from scene mutations.
//!
//! Every add, remove or modify event appends a [`Command`] holding a full
//! snapshot of the scene. Recording while the cursor is behind the end
//! discards the redo branch first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::event::{MutationKind, SceneEvent, SceneListener};
use crate::{CanvasError, CanvasResult, Scene};

/// A recorded mutation and the scene snapshot taken right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// What kind of mutation produced this entry.
    pub kind: MutationKind,
    /// Serialized scene after the mutation.
    pub snapshot: String,
}

/// Callback invoked with the full history and cursor after every change.
pub type HistoryObserver = Box<dyn FnMut(&[Command], Option<usize>) + Send>;

/// Append-only command sequence with an undo cursor.
#[derive(Default)]
pub struct CommandLog {
    commands: Vec<Command>,
    cursor: Option<usize>,
    observer: Option<HistoryObserver>,
}

impl std::fmt::Debug for CommandLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLog")
            .field("len", &self.commands.len())
            .field("cursor", &self.cursor)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl CommandLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(&[Command], Option<usize>) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Append a command, discarding everything after the cursor first.
    pub fn record(&mut self, kind: MutationKind, snapshot: String) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.commands.len() {
            tracing::debug!(
                "Discarding {} redo entries",
                self.commands.len() - keep
            );
            self.commands.truncate(keep);
        }
        self.commands.push(Command { kind, snapshot });
        self.cursor = Some(self.commands.len() - 1);
        tracing::debug!("Recorded {kind} command at index {}", self.commands.len() - 1);
        self.notify();
    }

    /// Move the cursor to `index` and return the snapshot recorded there.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::HistoryOutOfRange`] if no command exists at `index`.
    pub fn rewind_to(&mut self, index: usize) -> CanvasResult<&str> {
        if index >= self.commands.len() {
            return Err(CanvasError::HistoryOutOfRange {
                index,
                len: self.commands.len(),
            });
        }
        self.cursor = Some(index);
        self.notify();
        Ok(&self.commands[index].snapshot)
    }

    /// Step the cursor back one entry, returning the snapshot now current.
    ///
    /// Returns `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        let target = self.cursor?.checked_sub(1)?;
        self.cursor = Some(target);
        self.notify();
        Some(&self.commands[target].snapshot)
    }

    /// Step the cursor forward one entry, returning the snapshot now current.
    ///
    /// Returns `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        let target = self.cursor.map_or(0, |c| c + 1);
        if target >= self.commands.len() {
            return None;
        }
        self.cursor = Some(target);
        self.notify();
        Some(&self.commands[target].snapshot)
    }

    /// Recorded commands, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Index of the current command, `None` while empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether [`undo`](Self::undo) would move the cursor.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`redo`](Self::redo) would move the cursor.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.commands.len()
    }

    /// Drop all commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = None;
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.commands, self.cursor);
        }
    }
}

/// Shared handle to a [`CommandLog`] that records scene events.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    log: Arc<Mutex<CommandLog>>,
}

impl CommandRecorder {
    /// Create a recorder around a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a clone of this recorder to `scene`.
    pub fn attach(&self, scene: &mut Scene) -> crate::ListenerId {
        scene.subscribe(self.clone())
    }

    /// Lock the underlying log.
    pub fn log(&self) -> MutexGuard<'_, CommandLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SceneListener for CommandRecorder {
    fn on_scene_event(&mut self, event: SceneEvent, scene: &Scene) {
        match scene.to_json() {
            Ok(snapshot) => self.log().record(event.kind(), snapshot),
            Err(e) => tracing::warn!("Skipping history entry for {:?}: {e}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, TextStyle};

    fn snap(n: u32) -> String {
        format!("snapshot-{n}")
    }

    #[test]
    fn test_three_records_put_cursor_at_two() {
        let mut log = CommandLog::new();
        assert_eq!(log.cursor(), None);
        log.record(MutationKind::Add, snap(0));
        log.record(MutationKind::Modify, snap(1));
        log.record(MutationKind::Remove, snap(2));
        assert_eq!(log.len(), 3);
        assert_eq!(log.cursor(), Some(2));
    }

    #[test]
    fn test_record_after_rewind_discards_redo_branch() {
        let mut log = CommandLog::new();
        for n in 0..3 {
            log.record(MutationKind::Add, snap(n));
        }
        assert_eq!(log.rewind_to(0).expect("rewind"), "snapshot-0");
        log.record(MutationKind::Modify, snap(9));

        let snapshots: Vec<_> = log.commands().iter().map(|c| c.snapshot.as_str()).collect();
        assert_eq!(snapshots, vec!["snapshot-0", "snapshot-9"]);
        assert_eq!(log.cursor(), Some(1));
        assert_eq!(log.commands()[1].kind, MutationKind::Modify);
    }

    #[test]
    fn test_rewind_out_of_range() {
        let mut log = CommandLog::new();
        log.record(MutationKind::Add, snap(0));
        assert!(matches!(
            log.rewind_to(1),
            Err(CanvasError::HistoryOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(log.cursor(), Some(0));
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut log = CommandLog::new();
        assert!(log.undo().is_none());
        assert!(log.redo().is_none());
        for n in 0..3 {
            log.record(MutationKind::Add, snap(n));
        }
        assert!(!log.can_redo());
        assert_eq!(log.undo(), Some("snapshot-1"));
        assert_eq!(log.undo(), Some("snapshot-0"));
        assert_eq!(log.undo(), None);
        assert!(!log.can_undo());
        assert_eq!(log.redo(), Some("snapshot-1"));
        assert_eq!(log.redo(), Some("snapshot-2"));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn test_observer_sees_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut log = CommandLog::new();
        log.set_observer(move |commands, cursor| {
            sink.lock().expect("lock").push((commands.len(), cursor));
        });
        log.record(MutationKind::Add, snap(0));
        log.record(MutationKind::Add, snap(1));
        let _ = log.undo();

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![(1, Some(0)), (2, Some(1)), (2, Some(0))]
        );
    }

    #[test]
    fn test_recorder_captures_scene_snapshots() {
        let mut scene = Scene::default();
        let recorder = CommandRecorder::new();
        recorder.attach(&mut scene);

        scene.draw_grid();
        let id = scene.add_element(Element::text("a", 0.0, 0.0, TextStyle::default()));
        scene.update_element(id, |e| e.transform.y = 40.0).expect("update");
        scene.remove_element(&id).expect("remove");

        let log = recorder.log();
        let kinds: Vec<_> = log.commands().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![MutationKind::Add, MutationKind::Modify, MutationKind::Remove]
        );
        assert_eq!(log.cursor(), Some(2));

        let after_modify: crate::SceneDocument =
            serde_json::from_str(&log.commands()[1].snapshot).expect("snapshot json");
        assert_eq!(after_modify.objects.len(), 1);
        assert!((after_modify.objects[0].transform.y - 40.0).abs() < f32::EPSILON);
    }
}
