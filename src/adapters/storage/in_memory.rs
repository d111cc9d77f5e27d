//! In-memory session store for tests.
//!
//! Holds the blob as serialized JSON so loading still exercises the real
//! round-trip, and offers a failing mode to drive the tracker's
//! swallowed-persistence-failure path.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::session::TherapySession;
use crate::ports::{SessionStore, StoreError};

/// In-memory storage for the current session.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<String>>,
    fail_save: bool,
    save_count: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    /// Number of successful saves, for write-through assertions.
    pub fn saves(&self) -> usize {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Replaces the stored blob with arbitrary bytes, for corrupt-blob
    /// tolerance tests.
    pub fn inject_raw(&self, raw: &str) {
        *self.slot.lock().unwrap() = Some(raw.to_string());
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &TherapySession) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(StoreError::Io("simulated save failure".to_string()));
        }
        let json =
            serde_json::to_string(session).map_err(|e| StoreError::Serialize(e.to_string()))?;
        *self.slot.lock().unwrap() = Some(json);
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn load(&self) -> Result<Option<TherapySession>, StoreError> {
        let Some(json) = self.slot.lock().unwrap().clone() else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding undecodable session blob");
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
