//! One JSON file per user under a directory.

use crate::{DocumentStore, StoreError, UserId};
use async_trait::async_trait;
use ovl_core::LayoutDocument;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{user}.json"))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn upsert(&self, user: &UserId, doc: &LayoutDocument) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(user);
        let payload = serde_json::to_vec_pretty(doc)?;

        // Write beside the target, then rename over it
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &path).await?;
        log::debug!("file store: wrote {}", path.display());
        Ok(())
    }

    async fn fetch_one(&self, user: &UserId) -> Result<Option<LayoutDocument>, StoreError> {
        let path = self.path_for(user);
        let payload = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&payload)?))
    }
}
