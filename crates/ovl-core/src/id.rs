use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Next id to hand out. Zero means "not yet seeded".
static NEXT: AtomicU64 = AtomicU64::new(0);

/// Identifier of one element in a scene.
///
/// Fresh ids come from a process-wide counter seeded from the wall clock
/// (milliseconds), so they read like timestamps and survive a save/load
/// cycle without colliding with ids minted in a later session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw id, e.g. one read back from a saved document.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Mint a process-unique id.
    pub fn fresh() -> Self {
        ensure_seeded();
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure later `fresh()` calls never return `id` or anything below it.
    pub fn observe(id: ElementId) {
        ensure_seeded();
        NEXT.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

fn ensure_seeded() {
    if NEXT.load(Ordering::Relaxed) == 0 {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1)
            .max(1);
        let _ = NEXT.compare_exchange(0, seed, Ordering::Relaxed, Ordering::Relaxed);
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let a = ElementId::fresh();
        let b = ElementId::fresh();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn observe_skips_past_loaded_ids() {
        let far = ElementId::from_raw(ElementId::fresh().raw() + 1_000_000);
        ElementId::observe(far);
        assert!(ElementId::fresh() > far);
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = ElementId::from_raw(1717171717171);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1717171717171");
    }
}
