use crate::{DocumentStore, StoreError, UserId};
use async_trait::async_trait;
use ovl_core::LayoutDocument;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local store. Documents live as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<UserId, LayoutDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a saved document.
    pub fn len(&self) -> usize {
        self.docs.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, user: &UserId, doc: &LayoutDocument) -> Result<(), StoreError> {
        let mut docs = self.docs.lock().map_err(|_| poisoned())?;
        docs.insert(user.clone(), doc.clone());
        log::debug!("memory store: saved layout for {user} ({} elements)", doc.elements.len());
        Ok(())
    }

    async fn fetch_one(&self, user: &UserId) -> Result<Option<LayoutDocument>, StoreError> {
        let docs = self.docs.lock().map_err(|_| poisoned())?;
        Ok(docs.get(user).cloned())
    }
}
