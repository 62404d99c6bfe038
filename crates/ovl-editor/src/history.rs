//! Bounded linear undo history.
//!
//! Every committed edit stores a full `Scene` snapshot. A cursor points at
//! the active snapshot; undo walks the cursor back. Recording after an undo
//! drops everything past the cursor, and once the stack is longer than
//! `max_depth` the oldest snapshot is evicted. There is no redo.

use ovl_core::Scene;

pub struct History {
    entries: Vec<Scene>,
    /// Index of the active snapshot. Always `< entries.len()`.
    cursor: usize,
    /// Maximum number of snapshots kept, the active one included.
    max_depth: usize,
}

impl History {
    pub fn new(initial: Scene, max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        let mut entries = Vec::with_capacity(max_depth);
        entries.push(initial);
        Self {
            entries,
            cursor: 0,
            max_depth,
        }
    }

    /// Make `scene` the active snapshot.
    pub fn record(&mut self, scene: Scene) {
        // Drop the undone future
        self.entries.truncate(self.cursor + 1);
        self.entries.push(scene);
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
        log::debug!(
            "history: recorded snapshot {}/{}",
            self.cursor + 1,
            self.max_depth
        );
    }

    /// Step back one snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Scene> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("history: undo to snapshot {}", self.cursor + 1);
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Replace the whole stack with a single snapshot.
    pub fn reset(&mut self, initial: Scene) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }

    /// Overwrite the active snapshot without creating an undo step.
    pub fn amend(&mut self, scene: Scene) {
        self.entries[self.cursor] = scene;
    }

    pub fn current(&self) -> &Scene {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
