//! Editor configuration.
//!
//! Every field has a default matching the stock editor, so an empty JSON
//! object is a valid config.

use crate::scene::CanvasSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept for undo.
    pub history_depth: usize,
    /// Offset applied to pasted copies, in canvas pixels.
    pub paste_offset: f64,
    /// Canvas size of a new project.
    pub default_canvas: CanvasSize,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 20,
            paste_offset: 20.0,
            default_canvas: CanvasSize::FULL_HD,
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Clamp a zoom factor into the configured range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            1.0
        }
    }
}
