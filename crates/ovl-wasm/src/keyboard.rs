//! `keydown` on the browser window as an `InputSource`.

use ovl_editor::{FocusTarget, InputEvent, InputHandler, InputSource, Modifiers, ShortcutMap};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{KeyboardEvent, Window};

pub struct WindowKeySource {
    window: Window,
}

impl WindowKeySource {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// The page's window, if running in a browser main thread.
    pub fn from_global() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

impl InputSource for WindowKeySource {
    type Token = Closure<dyn FnMut(KeyboardEvent)>;

    fn subscribe(&mut self, mut handler: InputHandler) -> Self::Token {
        let listener = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let input = key_event(&event);
            // Keep the browser's own undo/copy/paste out of bound combos
            if is_shortcut(&input) {
                event.prevent_default();
            }
            handler(input);
        }) as Box<dyn FnMut(KeyboardEvent)>);

        if let Err(e) = self
            .window
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
        {
            log::warn!("cannot listen for keydown: {e:?}");
        }
        listener
    }

    fn unsubscribe(&mut self, token: Self::Token) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", token.as_ref().unchecked_ref())
        {
            log::warn!("cannot remove keydown listener: {e:?}");
        }
    }
}

fn key_event(event: &KeyboardEvent) -> InputEvent {
    let modifiers = Modifiers {
        ctrl: event.ctrl_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    };
    InputEvent::key(event.key(), modifiers, focus_of(event))
}

fn is_shortcut(event: &InputEvent) -> bool {
    match event {
        InputEvent::Key {
            key,
            modifiers,
            focus,
        } => ShortcutMap::resolve(key, *modifiers, *focus).is_some(),
        _ => false,
    }
}

/// Classify the element the keystroke was aimed at.
fn focus_of(event: &KeyboardEvent) -> FocusTarget {
    let Some(element) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    else {
        return FocusTarget::Canvas;
    };
    let editable = element
        .get_attribute("contenteditable")
        .is_some_and(|v| !v.eq_ignore_ascii_case("false"));
    FocusTarget::from_dom(&element.tag_name(), editable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_combos_claim_the_keystroke() {
        assert!(is_shortcut(&InputEvent::key("z", Modifiers::ctrl(), FocusTarget::Canvas)));
        assert!(is_shortcut(&InputEvent::key("Delete", Modifiers::NONE, FocusTarget::Canvas)));
        assert!(!is_shortcut(&InputEvent::key("z", Modifiers::NONE, FocusTarget::Canvas)));
    }

    #[test]
    fn text_fields_keep_their_keystrokes() {
        let focus = FocusTarget::from_dom("INPUT", false);
        assert!(!is_shortcut(&InputEvent::key("z", Modifiers::ctrl(), focus)));
        assert!(!is_shortcut(&InputEvent::PointerUp));
    }
}
