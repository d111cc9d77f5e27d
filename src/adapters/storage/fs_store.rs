//! File-based session store adapter.
//!
//! Keeps one JSON document per storage key under a data directory.
//! Writes go through a temporary file and a rename so a crash mid-write
//! never leaves a truncated blob; an unreadable blob on load is logged
//! and treated as absent rather than surfaced.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::session::TherapySession;
use crate::ports::{SessionStore, StoreError};

/// File-backed storage for the current session.
#[derive(Debug, Clone)]
pub struct FsSessionStore {
    path: PathBuf,
}

impl FsSessionStore {
    /// Creates a store writing `{data_dir}/{key}.json`.
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    /// Full path of the blob file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(format!("failed to create data directory: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FsSessionStore {
    async fn save(&self, session: &TherapySession) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        self.ensure_parent_dir().await?;

        // Write to a temporary file, then rename into place (atomic on Unix).
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &json)
            .await
            .map_err(|e| StoreError::Io(format!("failed to write temporary file: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::Io(format!("failed to rename into place: {}", e)))?;

        Ok(())
    }

    async fn load(&self) -> Result<Option<TherapySession>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(format!("failed to read blob: {}", e))),
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding undecodable session blob"
                );
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(format!("failed to remove blob: {}", e))),
        }
    }
}
