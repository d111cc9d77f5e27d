//! Session tracker - the lifecycle controller.
//!
//! One service object owns "what is happening right now": the current
//! session aggregate, the elapsed clock, and the write-through store.
//! It is constructed once at application start and handed to consumers
//! by reference; there is no ambient global.
//!
//! Every mutating operation runs to completion under one lock (the
//! clock task only touches the atomic counter), persists the full
//! aggregate on success, and reports `OpOutcome` instead of erroring:
//! persistence failures are logged and swallowed, unmet structural
//! preconditions are `Ignored`.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::clock::ElapsedClock;
use crate::domain::foundation::{PatientId, Percentage, Rating, TherapistId, Timestamp};
use crate::domain::session::{
    Activity, AchievementKind, Assessment, BreakKind, IgnoreReason, InterventionKind, OpOutcome,
    TherapySession,
};
use crate::ports::SessionStore;

/// Default planned session length in minutes when the caller gives none.
pub const DEFAULT_PLANNED_MINUTES: u32 = 45;

/// Tracks the lifecycle of the current practice session.
pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
    session: Mutex<Option<TherapySession>>,
    clock: ElapsedClock,
    default_planned_minutes: u32,
}

impl SessionTracker {
    /// Creates a tracker with no current session.
    pub fn new(store: Arc<dyn SessionStore>, default_planned_minutes: u32) -> Self {
        Self {
            store,
            session: Mutex::new(None),
            clock: ElapsedClock::new(),
            default_planned_minutes,
        }
    }

    /// Creates a tracker, adopting a persisted in-progress session if one
    /// exists: the elapsed counter is seeded from the wall-clock
    /// difference to the stored start date and the clock is armed.
    pub async fn resume(store: Arc<dyn SessionStore>, default_planned_minutes: u32) -> Self {
        let tracker = Self::new(Arc::clone(&store), default_planned_minutes);

        match store.load().await {
            Ok(Some(session)) if session.is_in_progress() => {
                let elapsed = Timestamp::now().seconds_since(session.date());
                tracker.clock.seed(elapsed);
                tracker.clock.arm();
                tracing::info!(
                    session = %session.id(),
                    elapsed_seconds = elapsed,
                    "resumed in-progress session"
                );
                *tracker.session.lock().await = Some(session);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to load persisted session; starting empty");
            }
        }

        tracker
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a new session, superseding any session already current.
    pub async fn start_session(
        &self,
        patient_id: PatientId,
        therapist_id: TherapistId,
        planned_minutes: Option<u32>,
    ) -> OpOutcome {
        let planned = planned_minutes.unwrap_or(self.default_planned_minutes);
        let mut guard = self.session.lock().await;

        if let Some(previous) = guard.as_ref() {
            tracing::info!(
                superseded = %previous.id(),
                "starting a new session while one is current"
            );
        }

        let session = TherapySession::begin(patient_id, therapist_id, planned);
        self.clock.reset();
        self.clock.arm();
        self.persist(&session).await;
        *guard = Some(session);
        OpOutcome::Applied
    }

    /// Ends the current session: force-closes an open activity, records
    /// the actual duration in whole minutes, and stops the clock.
    pub async fn end_session(&self) -> OpOutcome {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return OpOutcome::Ignored(IgnoreReason::NoCurrentSession);
        };

        let actual_minutes = (self.clock.elapsed_seconds() / 60) as u32;
        match session.complete(actual_minutes) {
            Ok(()) => {
                self.clock.disarm();
                self.persist(session).await;
                OpOutcome::Applied
            }
            Err(reason) => OpOutcome::Ignored(reason),
        }
    }

    /// Cancels the current session with the same teardown as `end_session`.
    pub async fn cancel_session(&self) -> OpOutcome {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return OpOutcome::Ignored(IgnoreReason::NoCurrentSession);
        };

        let actual_minutes = (self.clock.elapsed_seconds() / 60) as u32;
        match session.cancel(actual_minutes) {
            Ok(()) => {
                self.clock.disarm();
                self.persist(session).await;
                OpOutcome::Applied
            }
            Err(reason) => OpOutcome::Ignored(reason),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Child-record operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts an activity, force-closing any activity still open.
    pub async fn start_activity(
        &self,
        kind: impl Into<String>,
        target_sounds: Vec<String>,
        target_patterns: Vec<String>,
        difficulty: Rating,
    ) -> OpOutcome {
        let kind = kind.into();
        self.apply(move |session| {
            session.start_activity(kind, target_sounds, target_patterns, difficulty)
        })
        .await
    }

    /// Ends the open activity with its final scores.
    pub async fn end_activity(
        &self,
        engagement: Rating,
        success_rate: Percentage,
        tokens_earned: u32,
        notes: Option<String>,
    ) -> OpOutcome {
        self.apply(move |session| {
            session.close_activity(engagement, success_rate, tokens_earned, notes)
        })
        .await
    }

    /// Starts a break, force-closing any open activity first.
    pub async fn start_break(&self, kind: BreakKind) -> OpOutcome {
        self.apply(move |session| session.start_break(kind)).await
    }

    /// Ends the open break.
    pub async fn end_break(&self, effectiveness: Rating, notes: Option<String>) -> OpOutcome {
        self.apply(move |session| session.close_break(effectiveness, notes))
            .await
    }

    /// Logs an intervention against the open activity.
    pub async fn record_intervention(
        &self,
        kind: InterventionKind,
        effectiveness: Rating,
        notes: Option<String>,
    ) -> OpOutcome {
        self.apply(move |session| session.record_intervention(kind, effectiveness, notes))
            .await
    }

    /// Logs an achievement for the current session.
    pub async fn record_achievement(
        &self,
        kind: AchievementKind,
        description: impl Into<String>,
        reward: impl Into<String>,
        notes: Option<String>,
    ) -> OpOutcome {
        let description = description.into();
        let reward = reward.into();
        self.apply(move |session| session.record_achievement(kind, description, reward, notes))
            .await
    }

    /// Records a speech sample against the open activity.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_speech_sample(
        &self,
        target_sound: impl Into<String>,
        target_word: impl Into<String>,
        recording_ref: impl Into<String>,
        transcription: impl Into<String>,
        machine: Assessment,
        therapist: Option<Assessment>,
    ) -> OpOutcome {
        let target_sound = target_sound.into();
        let target_word = target_word.into();
        let recording_ref = recording_ref.into();
        let transcription = transcription.into();
        self.apply(move |session| {
            session.record_speech_sample(
                target_sound,
                target_word,
                recording_ref,
                transcription,
                machine,
                therapist,
            )
        })
        .await
    }

    /// Replaces the session notes.
    pub async fn update_notes(&self, notes: impl Into<String>) -> OpOutcome {
        let notes = notes.into();
        self.apply(move |session| {
            session.set_notes(notes);
            Ok(())
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current session, if any.
    pub async fn current_session(&self) -> Option<TherapySession> {
        self.session.lock().await.clone()
    }

    /// Snapshot of the open activity, if any.
    pub async fn current_activity(&self) -> Option<Activity> {
        self.session
            .lock()
            .await
            .as_ref()
            .and_then(|session| session.open_activity().cloned())
    }

    /// True while the current session is in progress.
    pub async fn is_session_active(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|session| session.is_in_progress())
    }

    /// True while the current session has an open break.
    pub async fn is_on_break(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|session| session.is_on_break())
    }

    /// Seconds counted since the session started (or the resume seed).
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    /// Planned seconds not yet elapsed; zero with no current session.
    pub async fn remaining_seconds(&self) -> u64 {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| {
                session
                    .planned_seconds()
                    .saturating_sub(self.clock.elapsed_seconds())
            })
            .unwrap_or(0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs one journal operation under the lock and persists on success.
    async fn apply<T>(
        &self,
        op: impl FnOnce(&mut TherapySession) -> Result<T, IgnoreReason>,
    ) -> OpOutcome {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return OpOutcome::Ignored(IgnoreReason::NoCurrentSession);
        };

        match op(session) {
            Ok(_) => {
                self.persist(session).await;
                OpOutcome::Applied
            }
            Err(reason) => OpOutcome::Ignored(reason),
        }
    }

    /// Write-through persistence; a failure is logged and the in-memory
    /// state stays authoritative.
    async fn persist(&self, session: &TherapySession) {
        if let Err(err) = self.store.save(session).await {
            tracing::warn!(
                session = %session.id(),
                error = %err,
                "failed to persist session; in-memory state remains authoritative"
            );
        }
    }
}
