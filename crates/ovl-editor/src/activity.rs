//! Serializes save, load and export.
//!
//! Only one of these may be in flight per session. A second request while
//! one is running is refused with `Busy` instead of queuing.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Save,
    Load,
    Export,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Activity::Save => "save",
            Activity::Load => "load",
            Activity::Export => "export",
        })
    }
}

/// Returned when another activity already holds the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot start {requested} while {running} is in progress")]
pub struct Busy {
    pub requested: Activity,
    pub running: Activity,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityGate {
    running: Rc<Cell<Option<Activity>>>,
}

impl ActivityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, activity: Activity) -> Result<ActivityGuard, Busy> {
        if let Some(running) = self.running.get() {
            return Err(Busy {
                requested: activity,
                running,
            });
        }
        self.running.set(Some(activity));
        Ok(ActivityGuard {
            running: Rc::clone(&self.running),
            activity,
        })
    }

    pub fn current(&self) -> Option<Activity> {
        self.running.get()
    }

    pub fn is_idle(&self) -> bool {
        self.running.get().is_none()
    }
}

/// Holds the gate until dropped.
#[derive(Debug)]
pub struct ActivityGuard {
    running: Rc<Cell<Option<Activity>>>,
    activity: Activity,
}

impl ActivityGuard {
    pub fn activity(&self) -> Activity {
        self.activity
    }
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.running.set(None);
    }
}
