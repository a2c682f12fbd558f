//! Capability interface over the drawing surface.
//!
//! Themes, persistence and export only need this narrow view of a scene;
//! [`Scene`] is the in-memory implementation.

use crate::{CanvasResult, Element, ElementId, Scene};

/// Minimal drawing-surface capabilities.
pub trait Surface {
    /// Add an object on top of the stack.
    fn add_object(&mut self, element: Element) -> ElementId;

    /// Remove an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist.
    fn remove_object(&mut self, id: ElementId) -> CanvasResult<Element>;

    /// All objects in stacking order, bottom first.
    fn list_objects(&self) -> Vec<&Element>;

    /// Mutable access to all objects for style changes. Not reported as
    /// user modifications.
    fn objects_mut(&mut self) -> Vec<&mut Element>;

    /// Serialize the surface content to an opaque snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn serialize(&self) -> CanvasResult<String>;

    /// Clear the surface and repopulate it from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is malformed.
    fn deserialize(&mut self, snapshot: &str) -> CanvasResult<()>;

    /// Set the background color.
    fn set_background(&mut self, color: &str);

    /// Current background color.
    fn background(&self) -> &str;

    /// Surface size in pixels.
    fn size(&self) -> (f32, f32);

    /// Re-render the surface.
    fn render(&mut self);
}

impl Surface for Scene {
    fn add_object(&mut self, element: Element) -> ElementId {
        self.add_element(element)
    }

    fn remove_object(&mut self, id: ElementId) -> CanvasResult<Element> {
        self.remove_element(&id)
    }

    fn list_objects(&self) -> Vec<&Element> {
        self.elements().collect()
    }

    fn objects_mut(&mut self) -> Vec<&mut Element> {
        self.elements_mut().collect()
    }

    fn serialize(&self) -> CanvasResult<String> {
        self.to_json()
    }

    fn deserialize(&mut self, snapshot: &str) -> CanvasResult<()> {
        self.load_json(snapshot)
    }

    fn set_background(&mut self, color: &str) {
        Scene::set_background(self, color);
    }

    fn background(&self) -> &str {
        Scene::background(self)
    }

    fn size(&self) -> (f32, f32) {
        (self.width(), self.height())
    }

    fn render(&mut self) {
        Scene::render(self);
    }
}
