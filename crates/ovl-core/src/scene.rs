//! The stage: an ordered list of elements plus the canvas size.
//!
//! Element order is stacking order, back to front. The last element is drawn
//! on top and wins hit tests.

use crate::error::ModelError;
use crate::id::ElementId;
use crate::model::Element;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Native output size of the stage, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const FULL_HD: CanvasSize = CanvasSize {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Result<Self, ModelError> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.width == 0 || self.height == 0 {
            return Err(ModelError::CanvasSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::FULL_HD
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub elements: Vec<Element>,
    pub canvas_size: CanvasSize,
}

impl Scene {
    /// Empty stage at the default 1920×1080.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas_size: CanvasSize) -> Self {
        Self {
            elements: Vec::new(),
            canvas_size,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn max_id(&self) -> Option<ElementId> {
        self.elements.iter().map(|e| e.id).max()
    }

    /// Topmost element under `point`, or `None` for bare canvas.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        // Walk in reverse (last painted = topmost)
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains(point))
            .map(|e| e.id)
    }

    /// Clamp element opacities, then check every element and id uniqueness.
    pub fn normalize(&mut self) -> Result<(), ModelError> {
        for element in &mut self.elements {
            element.clamp_opacity();
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.canvas_size.validate()?;
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            element.validate()?;
            if !seen.insert(element.id) {
                return Err(ModelError::DuplicateId(element.id));
            }
        }
        Ok(())
    }
}
