//! Scene graph for managing canvas elements.

use std::collections::HashMap;

use crate::event::{ListenerId, SceneEvent, SceneListener};
use crate::grid::{grid_lines, snap_to_grid, GridSettings};
use crate::{CanvasError, CanvasResult, Element, ElementId, SceneDocument};

/// Default canvas width in pixels.
pub const CANVAS_WIDTH: f32 = 800.0;

/// Default canvas height in pixels (A4 aspect at 800 wide).
pub const CANVAS_HEIGHT: f32 = 1131.0;

/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// A scene containing all canvas elements.
///
/// Elements keep their insertion order as stacking order. Every add, remove
/// and user modification of a non-guide element is dispatched to the
/// registered [`SceneListener`]s.
pub struct Scene {
    /// All elements in the scene, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Stacking order, bottom first.
    order: Vec<ElementId>,
    /// Background color as hex.
    background: String,
    width: f32,
    height: f32,
    /// Grid display and snapping.
    pub grid: GridSettings,
    listeners: Vec<(ListenerId, Box<dyn SceneListener>)>,
    next_listener: u64,
    render_count: u64,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("elements", &self.order.len())
            .field("background", &self.background)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("grid", &self.grid)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::blank(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl Scene {
    /// Create a new empty scene with the given surface size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::SurfaceInit`] if either dimension is not a
    /// positive finite number.
    pub fn try_new(width: f32, height: f32) -> CanvasResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CanvasError::SurfaceInit(format!(
                "invalid surface size {width}x{height}"
            )));
        }
        Ok(Self::blank(width, height))
    }

    fn blank(width: f32, height: f32) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            background: DEFAULT_BACKGROUND.to_string(),
            width,
            height,
            grid: GridSettings::default(),
            listeners: Vec::new(),
            next_listener: 0,
            render_count: 0,
        }
    }

    /// Register a mutation listener.
    pub fn subscribe(&mut self, listener: impl SceneListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: SceneEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener.on_scene_event(event, self);
        }
        self.listeners = listeners;
    }

    /// Add an element on top of the stack.
    ///
    /// An element whose id is already present replaces the existing one in
    /// place and is reported as a modification.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        let guide = element.guide;
        let replaced = self.elements.insert(id, element).is_some();
        if !replaced {
            self.order.push(id);
        }
        if !guide {
            if replaced {
                tracing::debug!("Replaced element {id}");
                self.emit(SceneEvent::Modified(id));
            } else {
                tracing::debug!("Added element {id}");
                self.emit(SceneEvent::Added(id));
            }
        }
        id
    }

    /// Remove an element from the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: &ElementId) -> CanvasResult<Element> {
        let element = self
            .elements
            .remove(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        self.order.retain(|eid| eid != id);
        if !element.guide {
            tracing::debug!("Removed element {id}");
            self.emit(SceneEvent::Removed(*id));
        }
        Ok(element)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Apply a user modification to an element and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn update_element<F>(&mut self, id: ElementId, f: F) -> CanvasResult<()>
    where
        F: FnOnce(&mut Element),
    {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        f(element);
        let guide = element.guide;
        if !guide {
            self.emit(SceneEvent::Modified(id));
        }
        Ok(())
    }

    /// Move an element during a drag, snapping its top-left corner when grid
    /// snapping is on.
    ///
    /// Called for every pointer move; no event is emitted until
    /// [`finish_drag`](Self::finish_drag).
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn drag_element(&mut self, id: ElementId, x: f32, y: f32) -> CanvasResult<(f32, f32)> {
        let grid = self.grid;
        let element = self
            .elements
            .get_mut(&id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let (x, y) = if grid.snap {
            (snap_to_grid(x, grid.size), snap_to_grid(y, grid.size))
        } else {
            (x, y)
        };
        element.transform.x = x;
        element.transform.y = y;
        Ok((x, y))
    }

    /// End a drag, reporting the move as a modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn finish_drag(&mut self, id: ElementId) -> CanvasResult<()> {
        self.update_element(id, |_| {})
    }

    /// All elements in stacking order, bottom first.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Mutable references to all elements. Changes made this way are not
    /// reported to listeners.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.values_mut()
    }

    /// Non-guide elements in stacking order.
    pub fn content_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements().filter(|e| !e.guide)
    }

    /// Find the topmost interactive element at the given canvas coordinates.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.elements.get(id))
            .find(|e| e.interactive && e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Get the number of elements in the scene, guides included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Background color.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Set the background color.
    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }

    /// Remove every element, notifying listeners once per removed non-guide element.
    pub fn clear(&mut self) {
        let ids: Vec<ElementId> = self.order.clone();
        for id in ids {
            // ids come from `order`, so the lookup cannot miss
            let _ = self.remove_element(&id);
        }
    }

    /// Redraw the guide grid, replacing any existing guide lines.
    pub fn draw_grid(&mut self) {
        self.remove_guides();
        for line in grid_lines(self.width, self.height, self.grid.size) {
            self.add_element(line);
        }
    }

    /// Remove all guide lines.
    pub fn remove_guides(&mut self) {
        self.elements.retain(|_, e| !e.guide);
        let elements = &self.elements;
        self.order.retain(|id| elements.contains_key(id));
    }

    /// Mark the surface as rendered.
    pub fn render(&mut self) {
        self.render_count += 1;
        tracing::trace!("Rendered scene ({} elements)", self.order.len());
    }

    /// Number of times [`render`](Self::render) was called.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Build the snapshot document of this scene. Guide lines are excluded.
    #[must_use]
    pub fn document(&self) -> SceneDocument {
        SceneDocument::from_scene(self)
    }

    /// Serialize the scene to a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(&self.document()).map_err(CanvasError::Serialization)
    }

    /// Replace the scene content with a snapshot, notifying listeners of each
    /// removal and addition. The guide grid is redrawn if shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be parsed; the scene is left
    /// untouched in that case.
    pub fn load_json(&mut self, json: &str) -> CanvasResult<()> {
        let (background, elements) = Self::parse_snapshot(json)?;
        self.clear();
        self.apply_snapshot(background, elements);
        Ok(())
    }

    /// Replace the scene content with a snapshot without notifying listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be parsed.
    pub fn restore_json(&mut self, json: &str) -> CanvasResult<()> {
        let (background, elements) = Self::parse_snapshot(json)?;
        let listeners = std::mem::take(&mut self.listeners);
        self.clear();
        self.apply_snapshot(background, elements);
        self.listeners = listeners;
        Ok(())
    }

    fn parse_snapshot(json: &str) -> CanvasResult<(String, Vec<Element>)> {
        let doc: SceneDocument = serde_json::from_str(json)?;
        let background = doc.background.clone();
        let elements = doc.into_elements()?;
        Ok((background, elements))
    }

    fn apply_snapshot(&mut self, background: String, elements: Vec<Element>) {
        self.background = background;
        if self.grid.show {
            self.draw_grid();
        }
        for element in elements {
            self.add_element(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{MutationKind, TextStyle, Transform};

    fn label(content: &str) -> Element {
        Element::text(content, 0.0, 0.0, TextStyle::default())
    }

    fn event_log(scene: &mut Scene) -> Arc<Mutex<Vec<MutationKind>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        scene.subscribe(move |event: SceneEvent, _: &Scene| {
            sink.lock().expect("lock").push(event.kind());
        });
        log
    }

    #[test]
    fn test_try_new_rejects_bad_size() {
        assert!(Scene::try_new(800.0, 1131.0).is_ok());
        assert!(matches!(
            Scene::try_new(0.0, 100.0),
            Err(CanvasError::SurfaceInit(_))
        ));
        assert!(Scene::try_new(f32::NAN, 100.0).is_err());
    }

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::default();
        assert!(scene.is_empty());

        let id = scene.add_element(label("Hello"));
        assert_eq!(scene.element_count(), 1);
        assert!(scene.get_element(id).is_some());

        scene.remove_element(&id).expect("should remove");
        assert!(scene.is_empty());
        assert!(matches!(
            scene.remove_element(&id),
            Err(CanvasError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_events_dispatched_for_content_only() {
        let mut scene = Scene::default();
        let log = event_log(&mut scene);

        scene.draw_grid();
        let id = scene.add_element(label("a"));
        scene
            .update_element(id, |e| e.transform.x = 10.0)
            .expect("update");
        scene.remove_element(&id).expect("remove");

        assert_eq!(
            *log.lock().expect("lock"),
            vec![MutationKind::Add, MutationKind::Modify, MutationKind::Remove]
        );
    }

    #[test]
    fn test_add_with_existing_id_replaces_as_modify() {
        let mut scene = Scene::default();
        let first = label("first");
        let mut second = label("second");
        second.id = first.id;
        let log = event_log(&mut scene);

        scene.add_element(first);
        let id = scene.add_element(second);

        assert_eq!(scene.element_count(), 1);
        assert_eq!(
            scene.get_element(id).expect("element").kind.content(),
            Some("second")
        );
        assert_eq!(
            *log.lock().expect("lock"),
            vec![MutationKind::Add, MutationKind::Modify]
        );
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let mut scene = Scene::default();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = scene.subscribe(move |_: SceneEvent, _: &Scene| {
            *sink.lock().expect("lock") += 1;
        });
        scene.add_element(label("a"));
        assert!(scene.unsubscribe(id));
        scene.add_element(label("b"));
        assert_eq!(*count.lock().expect("lock"), 1);
        assert!(!scene.unsubscribe(id));
    }

    #[test]
    fn test_listener_sees_post_mutation_state() {
        let mut scene = Scene::default();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        scene.subscribe(move |_: SceneEvent, s: &Scene| {
            sink.lock().expect("lock").push(s.element_count());
        });
        let id = scene.add_element(label("a"));
        scene.add_element(label("b"));
        scene.remove_element(&id).expect("remove");
        assert_eq!(*counts.lock().expect("lock"), vec![1, 2, 1]);
    }

    #[test]
    fn test_drag_snaps_continuously() {
        let mut scene = Scene::default();
        let log = event_log(&mut scene);
        let id = scene.add_element(label("drag me"));

        let pos = scene.drag_element(id, 33.0, 71.0).expect("drag");
        assert_eq!(pos, (40.0, 80.0));
        let pos = scene.drag_element(id, 49.0, 89.0).expect("drag");
        assert_eq!(pos, (40.0, 80.0));
        // Only the add so far; moves are silent
        assert_eq!(log.lock().expect("lock").len(), 1);

        scene.finish_drag(id).expect("finish");
        assert_eq!(log.lock().expect("lock").last(), Some(&MutationKind::Modify));
    }

    #[test]
    fn test_drag_without_snap_keeps_raw_position() {
        let mut scene = Scene::default();
        scene.grid.snap = false;
        let id = scene.add_element(label("free"));
        let pos = scene.drag_element(id, 33.0, 71.0).expect("drag");
        assert_eq!(pos, (33.0, 71.0));
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut scene = Scene::default();
        let bottom = label("bottom").with_transform(Transform::new(100.0, 100.0, 200.0, 50.0));
        let top = label("top").with_transform(Transform::new(150.0, 110.0, 200.0, 50.0));
        scene.add_element(bottom);
        let top_id = scene.add_element(top);

        assert_eq!(scene.element_at(160.0, 120.0), Some(top_id));
        assert!(scene.element_at(50.0, 50.0).is_none());
    }

    #[test]
    fn test_guides_are_not_hit() {
        let mut scene = Scene::default();
        scene.draw_grid();
        assert!(scene.element_at(0.0, 0.0).is_none());
    }

    #[test]
    fn test_draw_grid_replaces_existing_guides() {
        let mut scene = Scene::default();
        scene.add_element(label("keep"));
        scene.draw_grid();
        let first = scene.element_count();
        scene.draw_grid();
        assert_eq!(scene.element_count(), first);
        assert_eq!(scene.content_elements().count(), 1);
    }

    #[test]
    fn test_snapshot_excludes_guides_and_round_trips() {
        let mut scene = Scene::default();
        scene.draw_grid();
        scene.set_background("#fef6e4");
        scene.add_element(label("one"));
        scene.add_element(label("two"));

        let json = scene.to_json().expect("serialize");
        let doc = scene.document();
        assert_eq!(doc.objects.len(), 2);

        let mut other = Scene::default();
        other.grid.show = false;
        other.load_json(&json).expect("load");
        assert_eq!(other.background(), "#fef6e4");
        let contents: Vec<_> = other
            .elements()
            .filter_map(|e| e.kind.content())
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(other.to_json().expect("serialize"), json);
    }

    #[test]
    fn test_load_json_rejects_garbage_without_clearing() {
        let mut scene = Scene::default();
        scene.add_element(label("survivor"));
        assert!(scene.load_json("{not json").is_err());
        assert_eq!(scene.element_count(), 1);
    }

    #[test]
    fn test_restore_json_is_silent() {
        let mut source = Scene::default();
        source.add_element(label("x"));
        let json = source.to_json().expect("serialize");

        let mut scene = Scene::default();
        let log = event_log(&mut scene);
        scene.add_element(label("y"));
        scene.restore_json(&json).expect("restore");
        assert_eq!(log.lock().expect("lock").len(), 1);
        assert_eq!(scene.content_elements().count(), 1);
    }
}
