//! Scoped keyboard subscription.
//!
//! The editor listens to one global keyboard source while it is mounted.
//! `InputSubscription` ties that listener to a value: dropping the guard
//! removes the listener, so a disposed view never receives keystrokes.

use crate::input::InputEvent;

/// Callback invoked for each event the source delivers.
pub type InputHandler = Box<dyn FnMut(InputEvent)>;

/// A global event source (the DOM window, a test harness, ...).
pub trait InputSource {
    /// Opaque handle identifying one registered handler.
    type Token;

    fn subscribe(&mut self, handler: InputHandler) -> Self::Token;

    fn unsubscribe(&mut self, token: Self::Token);
}

/// Owns one registration on an `InputSource`; unsubscribes on drop.
pub struct InputSubscription<S: InputSource> {
    source: S,
    token: Option<S::Token>,
}

impl<S: InputSource> InputSubscription<S> {
    pub fn new(mut source: S, handler: InputHandler) -> Self {
        let token = source.subscribe(handler);
        Self {
            source,
            token: Some(token),
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unsubscribe now instead of at drop.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            self.source.unsubscribe(token);
            log::debug!("input subscription released");
        }
    }
}

impl<S: InputSource> Drop for InputSubscription<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FocusTarget, Modifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-process source that records registrations.
    #[derive(Clone, Default)]
    struct FakeSource {
        handlers: Rc<RefCell<Vec<(u32, InputHandler)>>>,
        next: Rc<RefCell<u32>>,
        unsubscribed: Rc<RefCell<Vec<u32>>>,
    }

    impl FakeSource {
        fn emit(&self, event: InputEvent) {
            for (_, h) in self.handlers.borrow_mut().iter_mut() {
                h(event.clone());
            }
        }
    }

    impl InputSource for FakeSource {
        type Token = u32;

        fn subscribe(&mut self, handler: InputHandler) -> u32 {
            let mut next = self.next.borrow_mut();
            *next += 1;
            self.handlers.borrow_mut().push((*next, handler));
            *next
        }

        fn unsubscribe(&mut self, token: u32) {
            self.handlers.borrow_mut().retain(|(t, _)| *t != token);
            self.unsubscribed.borrow_mut().push(token);
        }
    }

    #[test]
    fn drop_unsubscribes_exactly_once() {
        let source = FakeSource::default();
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        {
            let _sub = InputSubscription::new(
                source.clone(),
                Box::new(move |_| *counter.borrow_mut() += 1),
            );
            source.emit(InputEvent::key("Delete", Modifiers::NONE, FocusTarget::Canvas));
        }
        source.emit(InputEvent::key("Delete", Modifiers::NONE, FocusTarget::Canvas));

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(*source.unsubscribed.borrow(), vec![1]);
    }

    #[test]
    fn cancel_then_drop_does_not_double_unsubscribe() {
        let source = FakeSource::default();
        let mut sub = InputSubscription::new(source.clone(), Box::new(|_| {}));
        sub.cancel();
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(source.unsubscribed.borrow().len(), 1);
    }
}
