//! Session store port - durable storage for the current session blob.
//!
//! One named blob holds the full serialized aggregate. The contract is
//! deliberately forgiving on the read side: `load` returns `Ok(None)`
//! both when no blob exists and when a blob cannot be decoded (the
//! adapter logs the failure); only real storage-backend trouble is an
//! error, and the tracker logs rather than propagates it.

use async_trait::async_trait;

use crate::domain::session::TherapySession;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize session: {0}")]
    Serialize(String),

    #[error("storage I/O error: {0}")]
    Io(String),
}

/// Port for persisting and loading the current session aggregate.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Writes the full aggregate, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// - `Serialize` if the aggregate cannot be encoded
    /// - `Io` on storage-backend failure
    async fn save(&self, session: &TherapySession) -> Result<(), StoreError>;

    /// Reads the persisted aggregate.
    ///
    /// Returns `None` when no blob exists or the blob is undecodable.
    async fn load(&self) -> Result<Option<TherapySession>, StoreError>;

    /// Removes the persisted blob. Idempotent.
    async fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn store_errors_display_their_cause() {
        let err = StoreError::Serialize("unexpected end of input".to_string());
        assert!(err.to_string().contains("serialize"));
        let err = StoreError::Io("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
    }
}
