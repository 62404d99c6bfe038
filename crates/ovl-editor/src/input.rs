//! Input abstraction layer.
//!
//! Normalizes the host's pointer and keyboard events into `InputEvent`s
//! consumed by the editor session. Pointer coordinates are canvas pixels;
//! the host converts from screen space with `EditorSession::screen_to_canvas`.

use crate::gesture::ResizeHandle;
use ovl_core::kurbo::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, ⌘ on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }
}

/// What had keyboard focus when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The canvas, the page body, or a non-editable control.
    Canvas,
    /// A control that consumes typed text.
    TextEntry,
}

impl FocusTarget {
    /// Classify a DOM element by its tag name and `contenteditable` state.
    pub fn from_dom(tag_name: &str, content_editable: bool) -> Self {
        let tag = tag_name.to_ascii_uppercase();
        if content_editable || matches!(tag.as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
            FocusTarget::TextEntry
        } else {
            FocusTarget::Canvas
        }
    }

    pub fn is_text_entry(self) -> bool {
        self == FocusTarget::TextEntry
    }
}

/// A normalized input event from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed, optionally on one of the selection's resize handles.
    PointerDown {
        point: Point,
        handle: Option<ResizeHandle>,
    },
    PointerMove { point: Point },
    PointerUp,
    /// Gesture aborted (pointer capture lost, Escape).
    PointerCancel,
    Key {
        key: String,
        modifiers: Modifiers,
        focus: FocusTarget,
    },
}

impl InputEvent {
    pub fn key(key: impl Into<String>, modifiers: Modifiers, focus: FocusTarget) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
            focus,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { point, .. } | Self::PointerMove { point } => Some(*point),
            _ => None,
        }
    }
}
