//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native hosts share one binding table.

use crate::input::{FocusTarget, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Delete,
    Undo,
    Copy,
    Paste,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the combo has no binding, or if focus is in a text
    /// field where the keystroke belongs to the field.
    pub fn resolve(key: &str, mods: Modifiers, focus: FocusTarget) -> Option<ShortcutAction> {
        if focus.is_text_entry() {
            return None;
        }

        if mods.command() {
            // Shift+⌘Z is left to the host (no redo)
            if mods.shift {
                return None;
            }
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "c" | "C" => Some(ShortcutAction::Copy),
                "v" | "V" => Some(ShortcutAction::Paste),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: FocusTarget = FocusTarget::Canvas;

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE, CANVAS),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE, CANVAS),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn resolve_undo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", Modifiers::meta(), CANVAS),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", Modifiers::ctrl(), CANVAS),
            Some(ShortcutAction::Undo)
        );
        // Plain z does nothing
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE, CANVAS), None);
    }

    #[test]
    fn resolve_clipboard() {
        assert_eq!(
            ShortcutMap::resolve("c", Modifiers::ctrl(), CANVAS),
            Some(ShortcutAction::Copy)
        );
        assert_eq!(
            ShortcutMap::resolve("V", Modifiers::meta(), CANVAS),
            Some(ShortcutAction::Paste)
        );
    }

    #[test]
    fn text_entry_suppresses_everything() {
        let focus = FocusTarget::TextEntry;
        for (key, mods) in [
            ("Backspace", Modifiers::NONE),
            ("Delete", Modifiers::NONE),
            ("z", Modifiers::ctrl()),
            ("c", Modifiers::meta()),
            ("v", Modifiers::ctrl()),
        ] {
            assert_eq!(ShortcutMap::resolve(key, mods, focus), None, "{key}");
        }
    }

    #[test]
    fn shift_command_z_is_unbound() {
        let mods = Modifiers {
            shift: true,
            ..Modifiers::ctrl()
        };
        assert_eq!(ShortcutMap::resolve("z", mods, CANVAS), None);
    }
}
