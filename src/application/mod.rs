//! Application layer - the lifecycle controller and its clock.

mod clock;
mod tracker;

pub use clock::{format_mm_ss, ElapsedClock};
pub use tracker::{SessionTracker, DEFAULT_PLANNED_MINUTES};

use std::sync::Arc;

use crate::adapters::storage::FsSessionStore;
use crate::config::AppConfig;

/// Composition root: builds a tracker wired to the file store described
/// by `config`, resuming any persisted in-progress session.
pub async fn bootstrap(config: &AppConfig) -> SessionTracker {
    let store = Arc::new(FsSessionStore::new(
        &config.storage.data_dir,
        &config.storage.session_key,
    ));
    SessionTracker::resume(store, config.session.default_duration_mins).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PatientId, TherapistId};
    use tempfile::TempDir;

    #[tokio::test]
    async fn bootstrap_wires_the_file_store_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_dir = temp_dir.path().to_path_buf();

        let tracker = bootstrap(&config).await;
        assert!(tracker.current_session().await.is_none());

        tracker
            .start_session(
                PatientId::new("patient-1").unwrap(),
                TherapistId::new("therapist-1").unwrap(),
                None,
            )
            .await;

        // A second bootstrap against the same directory resumes the session.
        let resumed = bootstrap(&config).await;
        assert!(resumed.is_session_active().await);
        assert_eq!(
            resumed.current_session().await.unwrap().id(),
            tracker.current_session().await.unwrap().id()
        );
    }
}
