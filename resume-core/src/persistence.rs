//! Named templates and automatic version snapshots.
//!
//! Both collections live in memory and are mirrored to a [`KvStore`] under a
//! fixed key each; the stored value is rewritten in full on every change.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KvStore, StoreError};
use crate::{CanvasError, Feedback, Surface};

/// Store key of the template list.
pub const TEMPLATES_KEY: &str = "resume-templates";
/// Store key of the version history.
pub const VERSIONS_KEY: &str = "resume-version-history";
/// Most recent versions kept.
pub const MAX_VERSIONS: usize = 50;
/// Interval between automatic snapshots.
pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_millis(5000);
/// Description attached to automatic snapshots.
pub const AUTO_SAVE_DESCRIPTION: &str = "auto-saved";

/// Millisecond timestamp identifier of a template or version.
pub type LayoutId = u64;

/// Errors from layout persistence.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A stored snapshot could not be applied to the canvas.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Result type for layout persistence.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A user-named layout saved for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Creation timestamp in milliseconds, unique within the store.
    pub id: LayoutId,
    /// Name given by the user.
    pub name: String,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
    /// When the template was last written.
    pub updated_at: DateTime<Utc>,
    /// Scene snapshot.
    pub snapshot: String,
}

/// An automatically captured layout kept for recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    /// Capture timestamp in milliseconds, unique within the store.
    pub id: LayoutId,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Scene snapshot.
    pub snapshot: String,
    /// Why the snapshot was taken.
    pub description: String,
}

/// Template and version-history manager over a key-value store.
#[derive(Debug)]
pub struct LayoutPersistence<S> {
    store: S,
    templates: Vec<Template>,
    versions: Vec<VersionSnapshot>,
    last_id: LayoutId,
}

impl<S: KvStore> LayoutPersistence<S> {
    /// Load existing templates and versions from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds malformed data.
    pub fn open(store: S) -> LayoutResult<Self> {
        let templates: Vec<Template> = read_list(&store, TEMPLATES_KEY)?;
        let versions: Vec<VersionSnapshot> = read_list(&store, VERSIONS_KEY)?;
        let last_id = templates
            .iter()
            .map(|t| t.id)
            .chain(versions.iter().map(|v| v.id))
            .max()
            .unwrap_or(0);
        tracing::debug!(
            "Opened layout store with {} templates, {} versions",
            templates.len(),
            versions.len()
        );
        Ok(Self {
            store,
            templates,
            versions,
            last_id,
        })
    }

    /// Save the current surface as a template named `name`.
    ///
    /// Returns `None` without saving when there is no surface or `name` is
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be serialized or the store write fails.
    pub fn save_as_template(
        &mut self,
        surface: Option<&dyn Surface>,
        name: &str,
    ) -> LayoutResult<Option<LayoutId>> {
        let Some(surface) = surface else {
            return Ok(None);
        };
        if name.trim().is_empty() {
            return Ok(None);
        }
        let snapshot = surface.serialize()?;
        let (id, now) = self.next_id();
        let mut templates = self.templates.clone();
        templates.push(Template {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            snapshot,
        });
        write_list(&self.store, TEMPLATES_KEY, &templates)?;
        self.templates = templates;
        tracing::info!("Saved template {name:?} as {id}");
        Ok(Some(id))
    }

    /// Replace the surface content with template `id`.
    ///
    /// Returns `false` when there is no surface or no such template.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot is malformed.
    pub fn load_template(&self, surface: Option<&mut dyn Surface>, id: LayoutId) -> LayoutResult<bool> {
        let (Some(surface), Some(template)) = (surface, self.template(id)) else {
            return Ok(false);
        };
        surface.deserialize(&template.snapshot)?;
        surface.render();
        tracing::info!("Loaded template {id}");
        Ok(true)
    }

    /// Delete template `id`, keeping the order of the others.
    ///
    /// Returns whether a template was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn delete_template(&mut self, id: LayoutId) -> LayoutResult<bool> {
        if self.template(id).is_none() {
            return Ok(false);
        }
        let templates: Vec<Template> = self
            .templates
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        write_list(&self.store, TEMPLATES_KEY, &templates)?;
        self.templates = templates;
        tracing::info!("Deleted template {id}");
        Ok(true)
    }

    /// Take an automatic snapshot of the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be serialized or the store write fails.
    pub fn auto_save(&mut self, surface: Option<&dyn Surface>) -> LayoutResult<Option<LayoutId>> {
        self.save_version(surface, AUTO_SAVE_DESCRIPTION)
    }

    /// Take a snapshot of the surface with a description, keeping only the
    /// newest [`MAX_VERSIONS`] entries.
    ///
    /// Returns `None` without saving when there is no surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be serialized or the store write fails.
    pub fn save_version(
        &mut self,
        surface: Option<&dyn Surface>,
        description: &str,
    ) -> LayoutResult<Option<LayoutId>> {
        let Some(surface) = surface else {
            return Ok(None);
        };
        let snapshot = surface.serialize()?;
        let (id, now) = self.next_id();
        let mut versions = self.versions.clone();
        versions.push(VersionSnapshot {
            id,
            timestamp: now,
            snapshot,
            description: description.to_string(),
        });
        if versions.len() > MAX_VERSIONS {
            let excess = versions.len() - MAX_VERSIONS;
            versions.drain(..excess);
        }
        write_list(&self.store, VERSIONS_KEY, &versions)?;
        self.versions = versions;
        tracing::debug!("Saved version {id} ({description})");
        Ok(Some(id))
    }

    /// Replace the surface content with version `id`.
    ///
    /// Returns `false` when there is no surface or no such version.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot is malformed.
    pub fn restore_version(&self, surface: Option<&mut dyn Surface>, id: LayoutId) -> LayoutResult<bool> {
        let (Some(surface), Some(version)) = (surface, self.version(id)) else {
            return Ok(false);
        };
        surface.deserialize(&version.snapshot)?;
        surface.render();
        tracing::info!("Restored version {id}");
        Ok(true)
    }

    /// Drop the whole version history after the user confirms.
    ///
    /// On confirmation the stored key is removed entirely. Returns whether
    /// the history was cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub fn clear_version_history(&mut self, feedback: &dyn Feedback) -> LayoutResult<bool> {
        if !feedback.confirm("Clear the entire version history?") {
            return Ok(false);
        }
        self.store.remove(VERSIONS_KEY)?;
        self.versions.clear();
        tracing::info!("Cleared version history");
        Ok(true)
    }

    /// Templates in save order.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Template by id.
    #[must_use]
    pub fn template(&self, id: LayoutId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Versions in chronological order, oldest first.
    #[must_use]
    pub fn versions(&self) -> &[VersionSnapshot] {
        &self.versions
    }

    /// Versions newest first, as listed to the user.
    pub fn versions_newest_first(&self) -> impl Iterator<Item = &VersionSnapshot> {
        self.versions.iter().rev()
    }

    /// Version by id.
    #[must_use]
    pub fn version(&self, id: LayoutId) -> Option<&VersionSnapshot> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Millisecond timestamp id, bumped past the previous one when the clock
    /// has not advanced.
    fn next_id(&mut self) -> (LayoutId, DateTime<Utc>) {
        let now = Utc::now();
        let millis = LayoutId::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        (id, now)
    }
}

fn read_list<T, S>(store: &S, key: &str) -> Result<Vec<T>, StoreError>
where
    T: serde::de::DeserializeOwned,
    S: KvStore,
{
    match store.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn write_list<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StoreError>
where
    T: Serialize,
    S: KvStore,
{
    let json = serde_json::to_string(items)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::{Element, LogFeedback, Scene, TextStyle};

    fn scene_with(content: &str) -> Scene {
        let mut scene = Scene::default();
        scene.grid.show = false;
        scene.add_element(Element::text(content, 10.0, 10.0, TextStyle::default()));
        scene
    }

    fn open() -> LayoutPersistence<MemoryStore> {
        LayoutPersistence::open(MemoryStore::new()).expect("open")
    }

    #[test]
    fn test_save_requires_surface_and_name() {
        let mut layouts = open();
        let scene = scene_with("a");
        assert_eq!(layouts.save_as_template(None, "x").expect("save"), None);
        assert_eq!(layouts.save_as_template(Some(&scene), "").expect("save"), None);
        assert!(layouts.templates().is_empty());
        assert!(!layouts.store().contains(TEMPLATES_KEY));
    }

    #[test]
    fn test_blank_name_is_not_saved() {
        let mut layouts = open();
        let scene = scene_with("a");
        assert_eq!(layouts.save_as_template(Some(&scene), "   ").expect("save"), None);
        assert_eq!(layouts.save_as_template(Some(&scene), "\t\n").expect("save"), None);
        assert!(layouts.templates().is_empty());
        assert!(!layouts.store().contains(TEMPLATES_KEY));
    }

    /// Store whose writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: std::cell::Cell<bool>,
    }

    impl KvStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_writes_leave_memory_unchanged() {
        let mut layouts = LayoutPersistence::open(FlakyStore::default()).expect("open");
        let scene = scene_with("a");
        let kept = layouts
            .save_as_template(Some(&scene), "kept")
            .expect("save")
            .expect("id");
        layouts.auto_save(Some(&scene)).expect("auto");

        layouts.store().fail_writes.set(true);
        assert!(layouts.save_as_template(Some(&scene), "lost").is_err());
        assert!(layouts.auto_save(Some(&scene)).is_err());
        assert!(layouts.delete_template(kept).is_err());
        assert!(layouts
            .clear_version_history(&LogFeedback::accepting())
            .is_err());

        let names: Vec<_> = layouts.templates().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["kept"]);
        assert_eq!(layouts.versions().len(), 1);

        layouts.store().fail_writes.set(false);
        layouts.auto_save(Some(&scene)).expect("auto");
        let stored: Vec<VersionSnapshot> = serde_json::from_str(
            &layouts.store().get(VERSIONS_KEY).expect("get").expect("stored"),
        )
        .expect("parse");
        assert_eq!(stored.len(), 2);
        let stored: Vec<Template> = serde_json::from_str(
            &layouts.store().get(TEMPLATES_KEY).expect("get").expect("stored"),
        )
        .expect("parse");
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_save_then_load_restores_snapshot() {
        let mut layouts = open();
        let scene = scene_with("original");
        let saved = scene.to_json().expect("json");
        let id = layouts
            .save_as_template(Some(&scene), "Two column")
            .expect("save")
            .expect("id");

        let mut target = scene_with("something else");
        assert!(layouts.load_template(Some(&mut target), id).expect("load"));
        assert_eq!(target.to_json().expect("json"), saved);
        assert_eq!(layouts.template(id).map(|t| t.name.as_str()), Some("Two column"));
    }

    #[test]
    fn test_load_missing_template_is_noop() {
        let layouts = open();
        let mut target = scene_with("unchanged");
        let before = target.to_json().expect("json");
        assert!(!layouts.load_template(Some(&mut target), 42).expect("load"));
        assert!(!layouts.load_template(None, 42).expect("load"));
        assert_eq!(target.to_json().expect("json"), before);
    }

    #[test]
    fn test_delete_keeps_others_in_order() {
        let mut layouts = open();
        let scene = scene_with("a");
        let ids: Vec<_> = ["one", "two", "three"]
            .iter()
            .map(|n| layouts.save_as_template(Some(&scene), n).expect("save").expect("id"))
            .collect();

        assert!(layouts.delete_template(ids[1]).expect("delete"));
        assert!(!layouts.delete_template(ids[1]).expect("delete again"));
        let names: Vec<_> = layouts.templates().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);

        let reopened = LayoutPersistence::open(layouts.store().clone()).expect("reopen");
        assert_eq!(reopened.templates(), layouts.templates());
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut layouts = open();
        let scene = scene_with("a");
        let a = layouts.save_as_template(Some(&scene), "a").expect("save").expect("id");
        let b = layouts.auto_save(Some(&scene)).expect("auto").expect("id");
        let c = layouts.save_as_template(Some(&scene), "c").expect("save").expect("id");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_version_cap_drops_oldest() {
        let mut layouts = open();
        let scene = scene_with("a");
        let ids: Vec<_> = (0..51)
            .map(|_| layouts.auto_save(Some(&scene)).expect("auto").expect("id"))
            .collect();

        assert_eq!(layouts.versions().len(), MAX_VERSIONS);
        assert!(layouts.version(ids[0]).is_none());
        let kept: Vec<_> = layouts.versions().iter().map(|v| v.id).collect();
        assert_eq!(kept, ids[1..].to_vec());
        assert!(layouts
            .versions()
            .iter()
            .all(|v| v.description == AUTO_SAVE_DESCRIPTION));

        let stored: Vec<VersionSnapshot> = serde_json::from_str(
            &layouts.store().get(VERSIONS_KEY).expect("get").expect("stored"),
        )
        .expect("parse");
        assert_eq!(stored.len(), MAX_VERSIONS);
    }

    #[test]
    fn test_auto_save_without_surface_is_noop() {
        let mut layouts = open();
        assert_eq!(layouts.auto_save(None).expect("auto"), None);
        assert!(layouts.versions().is_empty());
    }

    #[test]
    fn test_restore_version() {
        let mut layouts = open();
        let first = scene_with("v1");
        let id = layouts.auto_save(Some(&first)).expect("auto").expect("id");
        layouts.auto_save(Some(&scene_with("v2"))).expect("auto");

        let mut target = scene_with("now");
        assert!(layouts.restore_version(Some(&mut target), id).expect("restore"));
        assert_eq!(target.to_json().expect("json"), first.to_json().expect("json"));
        let newest = layouts.versions_newest_first().next().expect("newest");
        assert_ne!(newest.id, id);
    }

    #[test]
    fn test_clear_history_needs_confirmation() {
        let mut layouts = open();
        layouts.auto_save(Some(&scene_with("a"))).expect("auto");

        assert!(!layouts
            .clear_version_history(&LogFeedback::declining())
            .expect("clear"));
        assert_eq!(layouts.versions().len(), 1);
        assert!(layouts.store().contains(VERSIONS_KEY));

        assert!(layouts
            .clear_version_history(&LogFeedback::accepting())
            .expect("clear"));
        assert!(layouts.versions().is_empty());
        assert!(!layouts.store().contains(VERSIONS_KEY));
    }

    #[test]
    fn test_open_rejects_corrupt_store() {
        let store = MemoryStore::new();
        store.set(TEMPLATES_KEY, "{oops").expect("set");
        assert!(matches!(
            LayoutPersistence::open(store),
            Err(LayoutError::Store(StoreError::Serialization(_)))
        ));
    }
}
