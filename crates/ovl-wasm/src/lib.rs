//! WASM bridge: exposes the overlay editor to the browser page.
//!
//! Built with `wasm-pack build --target web`. The page owns rendering,
//! rasterization and the cloud backend; everything that decides what the
//! layout *is* lives here. Structured results cross the boundary as JSON
//! strings.

mod keyboard;

use keyboard::WindowKeySource;
use ovl_core::kurbo::Point;
use ovl_core::{EditorConfig, ElementId, LayoutDocument, ModelError, render_attributes_for};
use ovl_editor::{
    Activity, ActivityGuard, EditorSession, FocusTarget, GeometryUpdate, InputEvent,
    InputSubscription, LayerDirection, Modifiers, NewElement, ResizeHandle, ShortcutAction,
};
use ovl_export::{ExportConfig, RenderOptions, render_html, render_svg};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// The browser-facing editor.
///
/// The session is shared with the window keyboard listener, so every call
/// borrows it for the duration of the call only.
#[wasm_bindgen]
pub struct OverlayEditor {
    session: Rc<RefCell<EditorSession>>,
    export: ExportConfig,
    on_change: Rc<RefCell<Option<js_sys::Function>>>,
    keyboard: Option<InputSubscription<WindowKeySource>>,
    /// Held from `begin_activity` until `end_activity`.
    activity: Option<ActivityGuard>,
}

#[wasm_bindgen]
impl OverlayEditor {
    /// Create an editor. `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("ignoring invalid editor config: {e}");
                EditorConfig::default()
            })
        };

        Self {
            session: Rc::new(RefCell::new(EditorSession::new(config))),
            export: ExportConfig::default(),
            on_change: Rc::new(RefCell::new(None)),
            keyboard: None,
            activity: None,
        }
    }

    /// Called with no arguments whenever a window keystroke edits the scene.
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        *self.on_change.borrow_mut() = Some(callback);
    }

    // ─── Scene ───────────────────────────────────────────────────────────

    /// The scene as displayed, including an in-progress drag or resize.
    pub fn scene_json(&self) -> String {
        serde_json::to_string(self.session.borrow().scene()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Inline CSS for one element, or an empty string.
    pub fn element_css(&self, id: f64) -> String {
        let session = self.session.borrow();
        session
            .scene()
            .find(element_id(id))
            .map(|el| render_attributes_for(el).to_css())
            .unwrap_or_default()
    }

    /// SVG of the live canvas with selection outline and placeholders.
    pub fn editor_svg(&self) -> String {
        let session = self.session.borrow();
        render_svg(session.scene(), &RenderOptions::editor(session.selected()))
    }

    /// Add an element from `{"type":"shape","subtype":"star"}` and friends.
    /// Returns the new id, or `-1` on a malformed request.
    pub fn add_element(&mut self, json: &str) -> f64 {
        match serde_json::from_str::<NewElement>(json) {
            Ok(kind) => self.session.borrow_mut().add_element(kind).raw() as f64,
            Err(e) => {
                log::warn!("bad add_element payload: {e}");
                -1.0
            }
        }
    }

    /// Apply `{"kind":"position",...}` or `{"kind":"size",...}`.
    pub fn update_geometry(&mut self, id: f64, json: &str) -> String {
        let update: GeometryUpdate = match serde_json::from_str(json) {
            Ok(u) => u,
            Err(e) => return error_json(&e.to_string()),
        };
        changed_json(self.session.borrow_mut().update_geometry(element_id(id), update))
    }

    /// Set one property of the selection. `value_json` is any JSON value.
    pub fn update_property(&mut self, key: &str, value_json: &str) -> String {
        let value: serde_json::Value = match serde_json::from_str(value_json) {
            Ok(v) => v,
            Err(e) => return error_json(&e.to_string()),
        };
        changed_json(self.session.borrow_mut().update_property_json(key, &value))
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.borrow_mut().delete_selected()
    }

    /// `"up"` or `"down"`.
    pub fn move_layer(&mut self, direction: &str) -> bool {
        let direction = match direction {
            "up" => LayerDirection::Up,
            "down" => LayerDirection::Down,
            _ => return false,
        };
        self.session.borrow_mut().move_layer(direction)
    }

    pub fn copy_selected(&mut self) -> bool {
        self.session.borrow_mut().copy_selected()
    }

    /// Paste the clipboard. Returns the new id, or `-1` when empty.
    pub fn paste(&mut self) -> f64 {
        self.session
            .borrow_mut()
            .paste()
            .map_or(-1.0, |id| id.raw() as f64)
    }

    pub fn undo(&mut self) -> bool {
        self.session.borrow_mut().undo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.borrow().can_undo()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: f64) -> bool {
        self.session.borrow_mut().select(element_id(id))
    }

    pub fn clear_selection(&mut self) {
        self.session.borrow_mut().clear_selection();
    }

    /// Selected id, or `-1`.
    pub fn selected_id(&self) -> f64 {
        self.session
            .borrow()
            .selected()
            .map_or(-1.0, |id| id.raw() as f64)
    }

    // ─── Project ─────────────────────────────────────────────────────────

    pub fn new_project(&mut self) {
        self.session.borrow_mut().new_project();
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> String {
        changed_json(self.session.borrow_mut().set_canvas_size(width, height))
    }

    /// Report an image's natural size once the browser has decoded it.
    pub fn resolve_image_size(&mut self, id: f64, natural_width: f64, natural_height: f64) -> bool {
        self.session
            .borrow_mut()
            .resolve_image_size(element_id(id), natural_width, natural_height)
            .unwrap_or_else(|e| {
                log::warn!("image size for #{id} rejected: {e}");
                false
            })
    }

    /// Persistable document stamped with `now_ms`.
    pub fn document_json(&self, now_ms: f64) -> String {
        let doc = self.session.borrow().to_document(now_ms.max(0.0) as u64);
        doc.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the scene with a stored document. History restarts.
    pub fn load_document(&mut self, json: &str) -> String {
        let doc = match LayoutDocument::from_json(json) {
            Ok(doc) => doc,
            Err(e) => return error_json(&e.to_string()),
        };
        match self.session.borrow_mut().load_document(doc) {
            Ok(()) => r#"{"ok":true}"#.to_string(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    // ─── Viewport & pointer ──────────────────────────────────────────────

    pub fn zoom(&self) -> f64 {
        self.session.borrow().zoom()
    }

    /// Returns the zoom actually applied after clamping.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.session.borrow_mut().set_zoom(zoom)
    }

    /// Pointer pressed at screen offset `(x, y)` from the canvas origin.
    /// `handle` names a resize handle (`"se"`, `"n"`, ...) or is empty.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, handle: &str) -> bool {
        let mut session = self.session.borrow_mut();
        let point = session.screen_to_canvas(Point::new(x, y));
        session.pointer_down(point, ResizeHandle::parse(handle))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let mut session = self.session.borrow_mut();
        let point = session.screen_to_canvas(Point::new(x, y));
        session.pointer_move(point)
    }

    pub fn handle_pointer_up(&mut self) -> String {
        changed_json(self.session.borrow_mut().pointer_up())
    }

    pub fn cancel_gesture(&mut self) {
        self.session.borrow_mut().cancel_gesture();
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle one key press forwarded by the page.
    /// Returns `{"changed":bool,"action":"<name>"}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        target_tag: &str,
        content_editable: bool,
    ) -> String {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        let focus = FocusTarget::from_dom(target_tag, content_editable);
        let mut session = self.session.borrow_mut();
        let before = session.committed_scene().clone();
        let action = session.handle_key(key, modifiers, focus);
        let changed = session.committed_scene() != &before;
        let name = action.map_or("none", action_name);
        format!(r#"{{"changed":{changed},"action":"{name}"}}"#)
    }

    /// Listen for shortcuts on the window until `detach_keyboard` or drop.
    pub fn attach_keyboard(&mut self) -> bool {
        if self.keyboard.is_some() {
            return true;
        }
        let Some(source) = WindowKeySource::from_global() else {
            return false;
        };

        let session = Rc::clone(&self.session);
        let on_change = Rc::clone(&self.on_change);
        let handler = Box::new(move |event: InputEvent| {
            let changed = match session.try_borrow_mut() {
                Ok(mut session) => session.handle_event(&event).unwrap_or(false),
                Err(_) => return,
            };
            // Cloned so the callback may replace itself
            let callback = on_change.borrow().clone();
            if changed && let Some(callback) = callback {
                let _ = callback.call0(&JsValue::NULL);
            }
        });
        self.keyboard = Some(InputSubscription::new(source, handler));
        true
    }

    pub fn detach_keyboard(&mut self) {
        self.keyboard = None;
    }

    // ─── Activities & export ─────────────────────────────────────────────

    /// Claim the save/load/export slot before an async host operation.
    /// Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn begin_activity(&mut self, kind: &str) -> String {
        let activity = match kind {
            "save" => Activity::Save,
            "load" => Activity::Load,
            "export" => Activity::Export,
            other => return error_json(&format!("unknown activity `{other}`")),
        };
        match self.session.borrow().gate().try_begin(activity) {
            Ok(guard) => {
                self.activity = Some(guard);
                r#"{"ok":true}"#.to_string()
            }
            Err(busy) => error_json(&busy.to_string()),
        }
    }

    /// Release the slot claimed by `begin_activity`.
    pub fn end_activity(&mut self) {
        self.activity = None;
    }

    pub fn is_busy(&self) -> bool {
        !self.session.borrow().gate().is_idle()
    }

    /// SVG of the committed scene without editor decorations, at native size.
    pub fn export_svg(&mut self) -> String {
        self.session
            .borrow_mut()
            .with_selection_hidden(|scene| render_svg(scene, &RenderOptions::export()))
    }

    /// Static HTML page of the scene, with `font_css` inlined when non-empty.
    pub fn export_html(&self, font_css: &str) -> String {
        let session = self.session.borrow();
        render_html(session.committed_scene(), Some(font_css))
    }

    pub fn png_file_name(&self) -> String {
        self.export.png_file_name.clone()
    }

    pub fn html_file_name(&self) -> String {
        self.export.html_file_name.clone()
    }

    /// Delay the page should wait before capturing.
    pub fn settle_delay_ms(&self) -> u32 {
        u32::try_from(self.export.settle_delay_ms).unwrap_or(u32::MAX)
    }
}

fn element_id(raw: f64) -> ElementId {
    ElementId::from_raw(raw.max(0.0) as u64)
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Delete => "delete",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Copy => "copy",
        ShortcutAction::Paste => "paste",
    }
}

fn changed_json(result: Result<bool, ModelError>) -> String {
    match result {
        Ok(changed) => format!(r#"{{"ok":true,"changed":{changed}}}"#),
        Err(e) => error_json(&e.to_string()),
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("overlay editor panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
