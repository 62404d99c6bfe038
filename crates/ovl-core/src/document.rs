//! Persisted form of a layout.
//!
//! A `LayoutDocument` is what gets written to the document store and to
//! `.json` files on disk. Layouts saved by earlier editor versions used
//! `canvasSize` / `updatedAt` and sometimes omitted fields entirely; both
//! spellings are accepted and missing pieces fall back to defaults.

use crate::error::ModelError;
use crate::id::ElementId;
use crate::model::Element;
use crate::scene::{CanvasSize, Scene};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, alias = "canvasSize")]
    pub canvas_size: CanvasSize,
    /// Epoch milliseconds of the last save.
    #[serde(default, alias = "updatedAt")]
    pub updated_at: u64,
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl LayoutDocument {
    pub fn from_scene(scene: &Scene, updated_at: u64) -> Self {
        Self {
            elements: scene.elements.clone(),
            canvas_size: scene.canvas_size,
            updated_at,
        }
    }

    /// Parse a document from JSON text. Structure only; see `into_scene`
    /// for semantic validation.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert into a validated scene. Ids seen here are reserved so later
    /// fresh ids cannot collide with them.
    pub fn into_scene(self) -> Result<Scene, ModelError> {
        let mut scene = Scene {
            elements: self.elements,
            canvas_size: self.canvas_size,
        };
        scene.normalize()?;
        if let Some(max) = scene.max_id() {
            ElementId::observe(max);
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_document_loads() {
        let json = r##"{
            "elements": [
                {"id": 1712000000000, "type": "webcam", "subtype": "simple", "x": 50, "y": 50,
                 "width": 480, "height": 270, "borderColor": "#00FF00", "borderWidth": 5,
                 "aspectRatio": true, "windowTitle": "Webcam", "borderRadius": 0},
                {"id": 1712000000001, "type": "text", "content": "TEXTO", "x": 100, "y": 100,
                 "fontSize": 80, "fontFamily": "'Roboto', sans-serif", "color": "#ffffff",
                 "width": 300, "height": 120, "shadow": true}
            ],
            "canvasSize": {"width": 1280, "height": 720},
            "updatedAt": 1712000000500
        }"##;
        let doc = LayoutDocument::from_json(json).unwrap();
        assert_eq!(doc.canvas_size, CanvasSize { width: 1280, height: 720 });
        assert_eq!(doc.updated_at, 1712000000500);

        let scene = doc.into_scene().unwrap();
        assert_eq!(scene.len(), 2);
        assert!(matches!(scene.elements[1].kind, ElementKind::Text(_)));
        assert!(ElementId::fresh().raw() > 1712000000001);
    }

    #[test]
    fn missing_fields_default() {
        let doc = LayoutDocument::from_json("{}").unwrap();
        assert!(doc.elements.is_empty());
        assert_eq!(doc.canvas_size, CanvasSize::FULL_HD);
        assert_eq!(doc.updated_at, 0);
    }

    #[test]
    fn invalid_scene_is_rejected() {
        let json = r#"{"elements": [], "canvas_size": {"width": 0, "height": 720}}"#;
        let doc = LayoutDocument::from_json(json).unwrap();
        assert!(doc.into_scene().is_err());
    }

    #[test]
    fn scene_roundtrips_through_document() {
        let mut scene = Scene::new();
        scene.elements.push(Element::text(ElementId::from_raw(9)));
        let doc = LayoutDocument::from_scene(&scene, 42);
        let text = doc.to_json().unwrap();
        let back = LayoutDocument::from_json(&text).unwrap().into_scene().unwrap();
        assert_eq!(back, scene);
    }
}
