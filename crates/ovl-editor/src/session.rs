//! Editor session: the interaction controller.
//!
//! Owns the history, the selection, the clipboard and the in-flight pointer
//! gesture. Every user-visible change computes a next `Scene` from the
//! active one and hands it to `commit`, which records it exactly once.
//! Pointer moves only touch a preview scene; the history sees the gesture
//! once, on pointer-up.

use crate::activity::ActivityGate;
use crate::gesture::{self, ResizeHandle};
use crate::history::History;
use crate::input::{FocusTarget, InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use ovl_core::error::{finite, non_negative};
use ovl_core::kurbo::{Point, Rect};
use ovl_core::{
    CameraStyle, CanvasSize, Dimension, EditorConfig, Element, ElementId, ElementKind,
    LayoutDocument, ModelError, Property, Scene, ShapeKind,
};
use serde::{Deserialize, Serialize};

/// What the toolbar's "add" buttons create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NewElement {
    Camera {
        #[serde(default)]
        subtype: CameraStyle,
    },
    Text,
    Shape {
        #[serde(default)]
        subtype: ShapeKind,
    },
    Image {
        src: String,
    },
}

impl NewElement {
    fn build(&self, id: ElementId) -> Element {
        match self {
            NewElement::Camera { subtype } => Element::camera(id, *subtype),
            NewElement::Text => Element::text(id),
            NewElement::Shape { subtype } => Element::shape(id, *subtype),
            NewElement::Image { src } => Element::image(id, src.clone()),
        }
    }
}

/// Result of a finished drag or resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeometryUpdate {
    Position {
        x: f64,
        y: f64,
    },
    Size {
        width: f64,
        height: f64,
        x: f64,
        y: f64,
    },
}

/// Direction of a single-step z-order move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerDirection {
    /// Towards the front (drawn later).
    Up,
    /// Towards the back.
    Down,
}

/// Text height used for font scaling when the old height is unknown.
const FALLBACK_TEXT_HEIGHT: f64 = 100.0;

/// Apply a geometry update to a copy of `element`.
///
/// Resizing text rescales its font by the height ratio so the glyphs keep
/// filling the box.
fn apply_geometry(element: &Element, update: GeometryUpdate) -> Result<Element, ModelError> {
    let mut next = element.clone();
    match update {
        GeometryUpdate::Position { x, y } => {
            next.x = finite("x", x)?;
            next.y = finite("y", y)?;
        }
        GeometryUpdate::Size {
            width,
            height,
            x,
            y,
        } => {
            let width = non_negative("width", width)?;
            let height = non_negative("height", height)?;
            next.x = finite("x", x)?;
            next.y = finite("y", y)?;
            if let ElementKind::Text(text) = &mut next.kind {
                let old_height = element
                    .height
                    .px()
                    .filter(|h| *h > 0.0)
                    .unwrap_or(FALLBACK_TEXT_HEIGHT);
                text.font_size = (text.font_size * height / old_height).round().max(1.0);
            }
            next.width = Dimension::Px(width);
            next.height = Dimension::Px(height);
        }
    }
    next.validate()?;
    Ok(next)
}

#[derive(Debug, Clone, Copy)]
enum GestureKind {
    Move,
    Resize { handle: ResizeHandle, lock: bool },
}

/// A drag or resize between pointer-down and pointer-up.
#[derive(Debug)]
struct ActiveGesture {
    id: ElementId,
    kind: GestureKind,
    /// Pointer position at pointer-down.
    grab: Point,
    /// Element bounds at pointer-down.
    start: Rect,
    preview: Option<Scene>,
    update: Option<GeometryUpdate>,
}

pub struct EditorSession {
    config: EditorConfig,
    history: History,
    selection: Option<ElementId>,
    clipboard: Option<Element>,
    gesture: Option<ActiveGesture>,
    zoom: f64,
    gate: ActivityGate,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let initial = Scene::with_canvas(config.default_canvas);
        Self {
            history: History::new(initial, config.history_depth),
            config,
            selection: None,
            clipboard: None,
            gesture: None,
            zoom: 1.0,
            gate: ActivityGate::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// What the canvas should show: the gesture preview while one is in
    /// flight, otherwise the active snapshot.
    pub fn scene(&self) -> &Scene {
        self.gesture
            .as_ref()
            .and_then(|g| g.preview.as_ref())
            .unwrap_or_else(|| self.history.current())
    }

    /// The active snapshot, ignoring any gesture preview.
    pub fn committed_scene(&self) -> &Scene {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.and_then(|id| self.scene().find(id))
    }

    pub fn clipboard(&self) -> Option<&Element> {
        self.clipboard.as_ref()
    }

    pub fn gate(&self) -> &ActivityGate {
        &self.gate
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    // ─── Commit path ─────────────────────────────────────────────────────

    /// Record `next` unless it equals the active scene.
    fn commit(&mut self, next: Scene) -> bool {
        if next == *self.history.current() {
            return false;
        }
        self.history.record(next);
        self.prune_selection();
        true
    }

    /// Drop a selection whose element no longer exists.
    fn prune_selection(&mut self) {
        if let Some(id) = self.selection
            && !self.history.current().contains(id)
        {
            self.selection = None;
        }
    }

    fn fresh_id(&self) -> ElementId {
        let scene = self.history.current();
        let mut id = ElementId::fresh();
        while scene.contains(id) {
            id = ElementId::fresh();
        }
        id
    }

    // ─── Element operations ──────────────────────────────────────────────

    /// Append a new element with its kind's defaults and select it.
    pub fn add_element(&mut self, kind: NewElement) -> ElementId {
        let id = self.fresh_id();
        let mut next = self.history.current().clone();
        next.elements.push(kind.build(id));
        self.commit(next);
        self.selection = Some(id);
        log::debug!("added {} element {id}", kind_label(&kind));
        id
    }

    /// Move or resize one element. `Ok(false)` when nothing changed.
    pub fn update_geometry(
        &mut self,
        id: ElementId,
        update: GeometryUpdate,
    ) -> Result<bool, ModelError> {
        let mut next = self.history.current().clone();
        let element = next.find_mut(id).ok_or(ModelError::UnknownElement(id))?;
        *element = apply_geometry(element, update)?;
        Ok(self.commit(next))
    }

    /// Set one attribute on the selected element. No-op without a selection.
    pub fn update_property(&mut self, property: Property) -> Result<bool, ModelError> {
        let Some(id) = self.selection else {
            return Ok(false);
        };
        let mut next = self.history.current().clone();
        let element = next.find_mut(id).ok_or(ModelError::UnknownElement(id))?;
        property.apply(element)?;
        Ok(self.commit(next))
    }

    /// `update_property` from the properties panel's key and raw value.
    pub fn update_property_json(
        &mut self,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<bool, ModelError> {
        if self.selection.is_none() {
            return Ok(false);
        }
        self.update_property(Property::parse(key, value)?)
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let mut next = self.history.current().clone();
        let Some(index) = next.index_of(id) else {
            self.selection = None;
            return false;
        };
        next.elements.remove(index);
        self.selection = None;
        self.commit(next)
    }

    /// Swap the selected element with its neighbour. No-op at either end.
    pub fn move_layer(&mut self, direction: LayerDirection) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let mut next = self.history.current().clone();
        let Some(index) = next.index_of(id) else {
            return false;
        };
        let other = match direction {
            LayerDirection::Up if index + 1 < next.len() => index + 1,
            LayerDirection::Down if index > 0 => index - 1,
            _ => return false,
        };
        next.elements.swap(index, other);
        self.commit(next)
    }

    /// Snapshot the selected element. Not an undo step.
    pub fn copy_selected(&mut self) -> bool {
        match self.selected_element().cloned() {
            Some(element) => {
                self.clipboard = Some(element);
                true
            }
            None => false,
        }
    }

    /// Insert an offset copy of the clipboard with a fresh id and select it.
    pub fn paste(&mut self) -> Option<ElementId> {
        let mut element = self.clipboard.clone()?;
        element.id = self.fresh_id();
        element.x += self.config.paste_offset;
        element.y += self.config.paste_offset;
        let id = element.id;

        let mut next = self.history.current().clone();
        next.elements.push(element);
        self.commit(next);
        self.selection = Some(id);
        Some(id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Step back one snapshot. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.gesture = None;
        if self.history.undo().is_none() {
            return false;
        }
        self.prune_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select `id` if it exists in the active scene.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.history.current().contains(id) {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Run `f` on the active scene with the selection cleared, then put
    /// the selection back.
    pub fn with_selection_hidden<R>(&mut self, f: impl FnOnce(&Scene) -> R) -> R {
        let stashed = self.selection.take();
        let result = f(self.history.current());
        self.selection = stashed;
        result
    }

    // ─── Project ─────────────────────────────────────────────────────────

    /// Empty the stage, keeping the canvas size. History restarts.
    pub fn new_project(&mut self) {
        let canvas = self.history.current().canvas_size;
        self.history.reset(Scene::with_canvas(canvas));
        self.selection = None;
        self.gesture = None;
    }

    /// Replace the whole scene. History restarts with it as the only entry.
    pub fn load_scene(&mut self, mut scene: Scene) -> Result<(), ModelError> {
        scene.normalize()?;
        if let Some(max) = scene.max_id() {
            ElementId::observe(max);
        }
        log::info!("loaded scene with {} elements", scene.len());
        self.history.reset(scene);
        self.selection = None;
        self.gesture = None;
        Ok(())
    }

    pub fn load_document(&mut self, doc: LayoutDocument) -> Result<(), ModelError> {
        let scene = doc.into_scene()?;
        self.load_scene(scene)
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<bool, ModelError> {
        let canvas = CanvasSize::new(width, height)?;
        let mut next = self.history.current().clone();
        next.canvas_size = canvas;
        Ok(self.commit(next))
    }

    /// Replace an image's `auto` side once its natural size is known.
    ///
    /// This is not a user edit, so the active snapshot is amended in place
    /// instead of recording a new undo step.
    pub fn resolve_image_size(
        &mut self,
        id: ElementId,
        natural_width: f64,
        natural_height: f64,
    ) -> Result<bool, ModelError> {
        let nw = non_negative("naturalWidth", natural_width)?;
        let nh = non_negative("naturalHeight", natural_height)?;
        if nw == 0.0 || nh == 0.0 {
            return Err(ModelError::InvalidValue {
                key: "naturalSize",
                expected: "a positive width and height",
            });
        }

        let mut next = self.history.current().clone();
        let element = next.find_mut(id).ok_or(ModelError::UnknownElement(id))?;
        if !matches!(element.kind, ElementKind::Image(_)) {
            return Err(ModelError::NotApplicable {
                key: "naturalSize",
                kind: element.kind_name(),
            });
        }
        let (width, height) = match (element.width, element.height) {
            (Dimension::Px(w), Dimension::Auto) => (w, w * nh / nw),
            (Dimension::Auto, Dimension::Px(h)) => (h * nw / nh, h),
            (Dimension::Auto, Dimension::Auto) => (nw, nh),
            (Dimension::Px(_), Dimension::Px(_)) => return Ok(false),
        };
        element.width = Dimension::Px(width);
        element.height = Dimension::Px(height);
        element.validate()?;

        self.history.amend(next);
        Ok(true)
    }

    pub fn to_document(&self, now_ms: u64) -> LayoutDocument {
        LayoutDocument::from_scene(self.history.current(), now_ms)
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the on-screen scale of the canvas. Returns the clamped value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = self.config.clamp_zoom(zoom);
        self.zoom
    }

    /// Convert a point relative to the on-screen canvas origin into canvas
    /// pixels.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(screen.x / self.zoom, screen.y / self.zoom)
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Start a gesture. With a `handle`, resizes the selected element;
    /// otherwise selects and starts moving whatever is under the pointer.
    /// Pressing on bare canvas clears the selection.
    pub fn pointer_down(&mut self, point: Point, handle: Option<ResizeHandle>) -> bool {
        self.gesture = None;
        let scene = self.history.current();

        if let Some(handle) = handle
            && let Some(id) = self.selection
            && let Some(element) = scene.find(id)
        {
            self.gesture = Some(ActiveGesture {
                id,
                kind: GestureKind::Resize {
                    handle,
                    lock: element.locks_aspect_ratio(),
                },
                grab: point,
                start: element.bounds(),
                preview: None,
                update: None,
            });
            return true;
        }

        match scene.hit_test(point).and_then(|id| scene.find(id)) {
            Some(element) => {
                self.selection = Some(element.id);
                self.gesture = Some(ActiveGesture {
                    id: element.id,
                    kind: GestureKind::Move,
                    grab: point,
                    start: element.bounds(),
                    preview: None,
                    update: None,
                });
                true
            }
            None => {
                self.selection = None;
                false
            }
        }
    }

    /// Update the gesture preview. Never touches history.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let canvas = self.history.current().canvas_size;
        let Some(g) = self.gesture.as_mut() else {
            return false;
        };
        let delta = point - g.grab;
        let update = match g.kind {
            GestureKind::Move => {
                let origin = gesture::drag(g.start, delta, canvas);
                GeometryUpdate::Position {
                    x: origin.x,
                    y: origin.y,
                }
            }
            GestureKind::Resize { handle, lock } => {
                let r = gesture::resize(g.start, handle, delta, lock, canvas);
                GeometryUpdate::Size {
                    width: r.width(),
                    height: r.height(),
                    x: r.x0,
                    y: r.y0,
                }
            }
        };

        let mut preview = self.history.current().clone();
        let Some(element) = preview.find_mut(g.id) else {
            return false;
        };
        match apply_geometry(element, update) {
            Ok(next) => *element = next,
            Err(e) => {
                log::warn!("gesture preview rejected: {e}");
                return false;
            }
        }
        g.preview = Some(preview);
        g.update = Some(update);
        true
    }

    /// Finish the gesture, committing its final geometry as one undo step.
    pub fn pointer_up(&mut self) -> Result<bool, ModelError> {
        let Some(g) = self.gesture.take() else {
            return Ok(false);
        };
        match g.update {
            Some(update) => self.update_geometry(g.id, update),
            None => Ok(false),
        }
    }

    /// Abort the gesture and drop its preview.
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and run a keyboard shortcut.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        focus: FocusTarget,
    ) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers, focus)?;
        match action {
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Copy => {
                self.copy_selected();
            }
            ShortcutAction::Paste => {
                self.paste();
            }
        }
        log::trace!("shortcut {key} -> {action:?}");
        Some(action)
    }

    /// Dispatch one normalized host event.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<bool, ModelError> {
        match event {
            InputEvent::PointerDown { point, handle } => Ok(self.pointer_down(*point, *handle)),
            InputEvent::PointerMove { point } => Ok(self.pointer_move(*point)),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::PointerCancel => {
                let active = self.gesture.is_some();
                self.cancel_gesture();
                Ok(active)
            }
            InputEvent::Key {
                key,
                modifiers,
                focus,
            } => Ok(self.handle_key(key, *modifiers, *focus).is_some()),
        }
    }
}

fn kind_label(kind: &NewElement) -> &'static str {
    match kind {
        NewElement::Camera { .. } => "camera",
        NewElement::Text => "text",
        NewElement::Shape { .. } => "shape",
        NewElement::Image { .. } => "image",
    }
}
