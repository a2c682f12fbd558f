//! Canonical serialized representation of a scene snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Element, ElementId, ElementKind, Scene, Transform};

/// Snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Document-friendly element description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Element identifier.
    pub id: String,
    /// Element content.
    pub kind: ElementKind,
    /// Transform metadata.
    #[serde(default = "ElementDocument::default_transform")]
    pub transform: Transform,
    /// Interactivity flag.
    #[serde(default = "ElementDocument::default_interactive")]
    pub interactive: bool,
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            kind: element.kind.clone(),
            transform: element.transform,
            interactive: element.interactive,
        }
    }
}

impl ElementDocument {
    fn default_transform() -> Transform {
        Transform::default()
    }

    const fn default_interactive() -> bool {
        true
    }

    /// Convert document to runtime element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSnapshot`] if the element id is not a valid UUID.
    pub fn into_element(self) -> CanvasResult<Element> {
        let id = ElementId::parse(&self.id)
            .map_err(|e| CanvasError::InvalidSnapshot(format!("element id {}: {e}", self.id)))?;
        let mut element = Element::new(self.kind)
            .with_transform(self.transform)
            .with_interactive(self.interactive);
        element.id = id;
        Ok(element)
    }
}

/// Canonical scene snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Snapshot format version.
    #[serde(default = "SceneDocument::default_version")]
    pub version: u32,
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
    /// Background color.
    pub background: String,
    /// Elements in stacking order, guide lines excluded.
    pub objects: Vec<ElementDocument>,
}

impl SceneDocument {
    const fn default_version() -> u32 {
        SNAPSHOT_VERSION
    }

    /// Build a document from a runtime scene.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            width: scene.width(),
            height: scene.height(),
            background: scene.background().to_string(),
            objects: scene.content_elements().map(ElementDocument::from).collect(),
        }
    }

    /// Materialize the elements of this document, in stacking order.
    ///
    /// # Errors
    ///
    /// Returns an error if any element cannot be materialized or two
    /// elements share an id.
    pub fn into_elements(self) -> CanvasResult<Vec<Element>> {
        let mut seen = HashSet::with_capacity(self.objects.len());
        self.objects
            .into_iter()
            .map(|doc| {
                let element = doc.into_element()?;
                if !seen.insert(element.id) {
                    return Err(CanvasError::InvalidSnapshot(format!(
                        "duplicate element id {}",
                        element.id
                    )));
                }
                Ok(element)
            })
            .collect()
    }

    /// Build a fresh scene from this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is invalid or any element cannot be materialized.
    pub fn into_scene(self) -> CanvasResult<Scene> {
        let mut scene = Scene::try_new(self.width, self.height)?;
        scene.grid.show = false;
        scene.set_background(self.background.clone());
        for element in self.into_elements()? {
            scene.add_element(element);
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextStyle;

    #[test]
    fn test_document_defaults_missing_fields() {
        let json = r##"{
            "width": 800.0,
            "height": 1131.0,
            "background": "#ffffff",
            "objects": [{
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "kind": {"type": "line", "data": {"x2": 10.0, "y2": 0.0, "stroke": "#000", "stroke_width": 1.0}}
            }]
        }"##;
        let doc: SceneDocument = serde_json::from_str(json).expect("parse");
        assert_eq!(doc.version, SNAPSHOT_VERSION);
        assert!(doc.objects[0].interactive);
        let elements = doc.into_elements().expect("materialize");
        assert_eq!(elements[0].kind.type_name(), "line");
    }

    #[test]
    fn test_bad_element_id_is_invalid_snapshot() {
        let doc = SceneDocument {
            version: SNAPSHOT_VERSION,
            width: 800.0,
            height: 600.0,
            background: "#fff".to_string(),
            objects: vec![ElementDocument {
                id: "nope".to_string(),
                kind: ElementKind::Text {
                    content: "x".to_string(),
                    style: TextStyle::default(),
                },
                transform: Transform::default(),
                interactive: true,
            }],
        };
        assert!(matches!(
            doc.into_elements(),
            Err(CanvasError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut scene = Scene::try_new(640.0, 480.0).expect("scene");
        scene.add_element(Element::text("only", 0.0, 0.0, TextStyle::default()));
        let mut doc = scene.document();
        let copy = doc.objects[0].clone();
        doc.objects.push(copy);

        let err = doc.into_elements().expect_err("duplicate id");
        assert!(
            matches!(&err, CanvasError::InvalidSnapshot(msg) if msg.contains("duplicate")),
            "{err}"
        );
    }

    #[test]
    fn test_into_scene_keeps_size_and_order() {
        let mut scene = Scene::try_new(640.0, 480.0).expect("scene");
        scene.add_element(Element::text("first", 0.0, 0.0, TextStyle::default()));
        scene.add_element(Element::text("second", 0.0, 0.0, TextStyle::default()));

        let rebuilt = scene.document().into_scene().expect("rebuild");
        assert!((rebuilt.width() - 640.0).abs() < f32::EPSILON);
        let contents: Vec<_> = rebuilt.elements().filter_map(|e| e.kind.content()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }
}
