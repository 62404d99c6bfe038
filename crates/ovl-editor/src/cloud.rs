//! Cloud save/load of the session's layout.
//!
//! Both calls are gated on a signed-in user and on the session's activity
//! gate. Nothing here mutates the session: `save` takes a document
//! snapshot, and `load` hands back a validated scene that the caller passes
//! to `EditorSession::load_scene`. A failed call leaves local state as it
//! was.

use crate::activity::{Activity, ActivityGate, Busy};
use ovl_core::{LayoutDocument, ModelError, Scene};
use ovl_store::{DocumentStore, StoreError, UserId};

#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("sign in to save or load layouts")]
    NotSignedIn,

    #[error(transparent)]
    Busy(#[from] Busy),

    #[error("document store: {0}")]
    Store(#[from] StoreError),

    #[error("saved layout is invalid: {0}")]
    Invalid(#[from] ModelError),
}

pub struct CloudSync<S> {
    store: S,
}

impl<S: DocumentStore> CloudSync<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn save(
        &self,
        gate: &ActivityGate,
        user: Option<&UserId>,
        doc: &LayoutDocument,
    ) -> Result<(), CloudError> {
        let user = user.ok_or(CloudError::NotSignedIn)?;
        let _guard = gate.try_begin(Activity::Save)?;
        self.store.upsert(user, doc).await?;
        log::info!("saved layout for {user} ({} elements)", doc.elements.len());
        Ok(())
    }

    /// The user's saved scene, or `None` when nothing was saved yet.
    pub async fn load(
        &self,
        gate: &ActivityGate,
        user: Option<&UserId>,
    ) -> Result<Option<Scene>, CloudError> {
        let user = user.ok_or(CloudError::NotSignedIn)?;
        let _guard = gate.try_begin(Activity::Load)?;
        let Some(doc) = self.store.fetch_one(user).await? else {
            log::info!("no saved layout for {user}");
            return Ok(None);
        };
        let scene = doc.into_scene()?;
        log::info!("loaded layout for {user} ({} elements)", scene.len());
        Ok(Some(scene))
    }
}
