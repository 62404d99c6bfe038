//! Per-user storage of layout documents.
//!
//! Each user owns at most one document. `upsert` replaces it wholesale and
//! `fetch_one` returns it, or `None` when the user has never saved.

pub mod error;
#[cfg(feature = "fs")]
pub mod file;
pub mod memory;

use async_trait::async_trait;
use ovl_core::LayoutDocument;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::StoreError;
#[cfg(feature = "fs")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Identity of the signed-in user that owns a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Accepts ids made of ASCII letters, digits, `-`, `_`, `.` and `@`,
    /// not starting with a dot. Auth providers hand out UUIDs or emails,
    /// both of which fit.
    pub fn new(raw: impl Into<String>) -> Result<Self, StoreError> {
        let raw = raw.into();
        let ok = !raw.is_empty()
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
        if ok {
            Ok(Self(raw))
        } else {
            Err(StoreError::InvalidUser(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = StoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote (or local) home of saved layouts, keyed by user.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the user's document.
    async fn upsert(&self, user: &UserId, doc: &LayoutDocument) -> Result<(), StoreError>;

    /// The user's document, if one was ever saved.
    async fn fetch_one(&self, user: &UserId) -> Result<Option<LayoutDocument>, StoreError>;
}
