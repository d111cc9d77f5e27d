//! TherapySession aggregate entity.
//!
//! The aggregate root for one bounded practice period. It exclusively
//! owns every child record (activities, breaks, achievements, speech
//! samples); children never outlive it and are never shared between
//! sessions. Cross-links (activity -> samples) are identifier references
//! only, and "the open activity/break" is derived by lookup rather than
//! held as a separate copy.
//!
//! # Invariants
//!
//! - `status` only moves forward: scheduled -> in-progress ->
//!   {completed, cancelled}
//! - At most one activity is open at any instant
//! - At most one break is open at any instant
//! - `tokens_earned` is strictly the running sum of close-activity token
//!   arguments; it is never recomputed from the activity records

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AchievementId, ActivityId, BreakId, InterventionId, PatientId, Percentage, Rating, SampleId,
    SessionId, SessionStatus, StateMachine, TherapistId, Timestamp,
};
use crate::domain::session::activity::{Activity, Intervention, InterventionKind};
use crate::domain::session::outcome::IgnoreReason;
use crate::domain::session::records::{
    Achievement, AchievementKind, Assessment, Break, BreakKind, SpeechSample,
};

/// Closing note when a new activity supersedes the open one.
pub const ACTIVITY_SUPERSEDED_NOTE: &str = "Activity ended before completion to start new activity";

/// Closing note when a break supersedes the open activity.
pub const ACTIVITY_PAUSED_NOTE: &str = "Activity paused for break";

/// Closing note when session end supersedes the open activity.
pub const SESSION_ENDED_NOTE: &str = "Session ended before activity completion";

/// One bounded practice period owned by one patient/therapist pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapySession {
    id: SessionId,
    patient_id: PatientId,
    therapist_id: TherapistId,
    /// When the session started; the resume seed for the elapsed clock.
    date: Timestamp,
    planned_minutes: u32,
    /// Actual length in whole minutes, set when the session closes.
    actual_minutes: u32,
    status: SessionStatus,
    activities: Vec<Activity>,
    breaks: Vec<Break>,
    achievements: Vec<Achievement>,
    speech_samples: Vec<SpeechSample>,
    tokens_earned: u32,
    notes: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TherapySession {
    /// Creates a new session, already in progress.
    pub fn begin(patient_id: PatientId, therapist_id: TherapistId, planned_minutes: u32) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            patient_id,
            therapist_id,
            date: now,
            planned_minutes,
            actual_minutes: 0,
            status: SessionStatus::InProgress,
            activities: Vec::new(),
            breaks: Vec::new(),
            achievements: Vec::new(),
            speech_samples: Vec::new(),
            tokens_earned: 0,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn therapist_id(&self) -> &TherapistId {
        &self.therapist_id
    }

    /// Session start time.
    pub fn date(&self) -> &Timestamp {
        &self.date
    }

    pub fn planned_minutes(&self) -> u32 {
        self.planned_minutes
    }

    /// Planned duration in seconds, for remaining-time arithmetic.
    pub fn planned_seconds(&self) -> u64 {
        u64::from(self.planned_minutes) * 60
    }

    pub fn actual_minutes(&self) -> u32 {
        self.actual_minutes
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn speech_samples(&self) -> &[SpeechSample] {
        &self.speech_samples
    }

    pub fn tokens_earned(&self) -> u32 {
        self.tokens_earned
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The open activity, if any.
    pub fn open_activity(&self) -> Option<&Activity> {
        self.activities.iter().find(|a| a.is_open())
    }

    /// The open break, if any.
    pub fn open_break(&self) -> Option<&Break> {
        self.breaks.iter().rev().find(|b| b.is_open())
    }

    pub fn is_on_break(&self) -> bool {
        self.open_break().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entity journal
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens a new activity, force-closing any activity still open.
    pub fn start_activity(
        &mut self,
        kind: impl Into<String>,
        target_sounds: Vec<String>,
        target_patterns: Vec<String>,
        difficulty: Rating,
    ) -> Result<ActivityId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        self.force_close_activity(ACTIVITY_SUPERSEDED_NOTE);

        let activity = Activity::open(
            self.id,
            kind.into(),
            target_sounds,
            target_patterns,
            difficulty,
        );
        let activity_id = *activity.id();
        self.activities.push(activity);
        self.touch();
        Ok(activity_id)
    }

    /// Closes the open activity with its final scores, accumulating the
    /// earned tokens into the session counter.
    pub fn close_activity(
        &mut self,
        engagement: Rating,
        success_rate: Percentage,
        tokens_earned: u32,
        notes: Option<String>,
    ) -> Result<ActivityId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        let activity = self
            .activities
            .iter_mut()
            .find(|a| a.is_open())
            .ok_or(IgnoreReason::NoOpenActivity)?;
        activity.close(engagement, success_rate, tokens_earned, notes);
        let activity_id = *activity.id();

        self.tokens_earned += tokens_earned;
        self.touch();
        Ok(activity_id)
    }

    /// The shared force-close rule: ends an open activity with a moderate
    /// engagement score, zero success, zero tokens, and the caller's
    /// context note. Invoked when a new activity, a break, or session end
    /// supersedes the open one. Returns `None` if nothing was open.
    pub fn force_close_activity(&mut self, note: &str) -> Option<ActivityId> {
        self.close_activity(Rating::MODERATE, Percentage::ZERO, 0, Some(note.to_string()))
            .ok()
    }

    /// Opens a break, force-closing any open activity first. Ignored if a
    /// break is already open.
    pub fn start_break(&mut self, kind: BreakKind) -> Result<BreakId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        if self.open_break().is_some() {
            return Err(IgnoreReason::BreakAlreadyOpen);
        }
        self.force_close_activity(ACTIVITY_PAUSED_NOTE);

        let brk = Break::open(self.id, kind);
        let break_id = *brk.id();
        self.breaks.push(brk);
        self.touch();
        Ok(break_id)
    }

    /// Closes the most recently started open break.
    pub fn close_break(
        &mut self,
        effectiveness: Rating,
        notes: Option<String>,
    ) -> Result<BreakId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        let brk = self
            .breaks
            .iter_mut()
            .rev()
            .find(|b| b.is_open())
            .ok_or(IgnoreReason::NoOpenBreak)?;
        brk.close(effectiveness, notes);
        let break_id = *brk.id();
        self.touch();
        Ok(break_id)
    }

    /// Appends an intervention to the open activity.
    pub fn record_intervention(
        &mut self,
        kind: InterventionKind,
        effectiveness: Rating,
        notes: Option<String>,
    ) -> Result<InterventionId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        let activity = self
            .activities
            .iter_mut()
            .find(|a| a.is_open())
            .ok_or(IgnoreReason::NoOpenActivity)?;
        let intervention = Intervention::record(*activity.id(), kind, effectiveness, notes);
        let intervention_id = *intervention.id();
        activity.push_intervention(intervention);
        self.touch();
        Ok(intervention_id)
    }

    /// Appends an achievement; valid whenever the session is in progress.
    pub fn record_achievement(
        &mut self,
        kind: AchievementKind,
        description: impl Into<String>,
        reward: impl Into<String>,
        notes: Option<String>,
    ) -> Result<AchievementId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        let achievement =
            Achievement::record(self.id, kind, description.into(), reward.into(), notes);
        let achievement_id = *achievement.id();
        self.achievements.push(achievement);
        self.touch();
        Ok(achievement_id)
    }

    /// Appends a speech sample to the session and back-references it from
    /// the open activity.
    #[allow(clippy::too_many_arguments)]
    pub fn record_speech_sample(
        &mut self,
        target_sound: impl Into<String>,
        target_word: impl Into<String>,
        recording_ref: impl Into<String>,
        transcription: impl Into<String>,
        machine: Assessment,
        therapist: Option<Assessment>,
    ) -> Result<SampleId, IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        let activity_id = *self
            .open_activity()
            .ok_or(IgnoreReason::NoOpenActivity)?
            .id();

        let sample = SpeechSample::record(
            self.id,
            activity_id,
            target_sound.into(),
            target_word.into(),
            recording_ref.into(),
            transcription.into(),
            machine,
            therapist,
        );
        let sample_id = *sample.id();
        self.speech_samples.push(sample);
        if let Some(activity) = self.activities.iter_mut().find(|a| a.is_open()) {
            activity.link_sample(sample_id);
        }
        self.touch();
        Ok(sample_id)
    }

    /// Replaces the session notes. Notes are not a child-record operation
    /// and stay editable after the session closes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.touch();
    }

    /// Completes the session: force-closes an open activity, then moves
    /// to the terminal Completed status with the actual length recorded.
    pub fn complete(&mut self, actual_minutes: u32) -> Result<(), IgnoreReason> {
        self.end_with(SessionStatus::Completed, actual_minutes)
    }

    /// Cancels the session with the same teardown as `complete`.
    pub fn cancel(&mut self, actual_minutes: u32) -> Result<(), IgnoreReason> {
        self.end_with(SessionStatus::Cancelled, actual_minutes)
    }

    fn end_with(
        &mut self,
        terminal: SessionStatus,
        actual_minutes: u32,
    ) -> Result<(), IgnoreReason> {
        if !self.is_in_progress() {
            return Err(IgnoreReason::SessionNotInProgress);
        }
        self.force_close_activity(SESSION_ENDED_NOTE);

        match self.status.transition_to(terminal) {
            Ok(status) => self.status = status,
            Err(_) => return Err(IgnoreReason::SessionNotInProgress),
        }
        self.actual_minutes = actual_minutes;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> TherapySession {
        TherapySession::begin(
            PatientId::new("patient-1").unwrap(),
            TherapistId::new("therapist-1").unwrap(),
            45,
        )
    }

    fn open_count(session: &TherapySession) -> usize {
        session.activities().iter().filter(|a| a.is_open()).count()
    }

    // Construction tests

    #[test]
    fn new_session_is_in_progress_and_empty() {
        let session = test_session();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert!(session.activities().is_empty());
        assert!(session.breaks().is_empty());
        assert!(session.achievements().is_empty());
        assert!(session.speech_samples().is_empty());
        assert_eq!(session.tokens_earned(), 0);
        assert_eq!(session.actual_minutes(), 0);
        assert_eq!(session.planned_seconds(), 45 * 60);
    }

    // Activity journal tests

    #[test]
    fn start_activity_opens_exactly_one() {
        let mut session = test_session();
        session
            .start_activity("DragonSpeechQuest", vec!["s".to_string()], vec![], Rating::new(2))
            .unwrap();
        assert_eq!(open_count(&session), 1);
        assert_eq!(session.open_activity().unwrap().kind(), "DragonSpeechQuest");
    }

    #[test]
    fn second_start_activity_force_closes_the_first() {
        let mut session = test_session();
        let first = session
            .start_activity("A", vec![], vec![], Rating::new(1))
            .unwrap();
        let second = session
            .start_activity("B", vec![], vec![], Rating::new(2))
            .unwrap();

        assert_eq!(open_count(&session), 1);
        assert_eq!(session.open_activity().unwrap().id(), &second);

        let closed = session
            .activities()
            .iter()
            .find(|a| a.id() == &first)
            .unwrap();
        assert!(!closed.is_open());
        assert_eq!(closed.tokens_earned(), 0);
        assert_eq!(closed.engagement(), Rating::MODERATE);
        assert_eq!(closed.notes(), ACTIVITY_SUPERSEDED_NOTE);
    }

    #[test]
    fn close_activity_scores_and_accumulates_tokens() {
        let mut session = test_session();
        session
            .start_activity("Quest", vec![], vec![], Rating::new(3))
            .unwrap();
        session
            .close_activity(Rating::new(4), Percentage::new(80), 3, None)
            .unwrap();

        assert_eq!(open_count(&session), 0);
        assert_eq!(session.tokens_earned(), 3);
        let activity = &session.activities()[0];
        assert_eq!(activity.engagement(), Rating::new(4));
        assert_eq!(activity.success_rate(), Percentage::new(80));
        assert_eq!(activity.tokens_earned(), 3);
        assert!(activity.ended_at().is_some());
    }

    #[test]
    fn force_close_applies_the_shared_rule() {
        let mut session = test_session();
        session
            .start_activity("Quest", vec![], vec![], Rating::new(5))
            .unwrap();
        let closed = session.force_close_activity("custom context note");

        assert!(closed.is_some());
        let activity = &session.activities()[0];
        assert!(!activity.is_open());
        assert_eq!(activity.engagement(), Rating::MODERATE);
        assert_eq!(activity.success_rate(), Percentage::ZERO);
        assert_eq!(activity.tokens_earned(), 0);
        assert_eq!(activity.notes(), "custom context note");
        assert_eq!(session.tokens_earned(), 0);
    }

    #[test]
    fn force_close_with_nothing_open_returns_none() {
        let mut session = test_session();
        assert!(session.force_close_activity("note").is_none());
    }

    #[test]
    fn close_activity_without_open_activity_is_ignored() {
        let mut session = test_session();
        let result = session.close_activity(Rating::new(4), Percentage::new(80), 3, None);
        assert_eq!(result, Err(IgnoreReason::NoOpenActivity));
        assert_eq!(session.tokens_earned(), 0);
    }

    #[test]
    fn tokens_are_the_exact_running_sum() {
        let mut session = test_session();
        for tokens in [3u32, 0, 5] {
            session
                .start_activity("Quest", vec![], vec![], Rating::new(2))
                .unwrap();
            session
                .close_activity(Rating::new(4), Percentage::new(70), tokens, None)
                .unwrap();
        }
        // A force-closed activity contributes zero.
        session
            .start_activity("Quest", vec![], vec![], Rating::new(2))
            .unwrap();
        session
            .start_activity("Quest2", vec![], vec![], Rating::new(2))
            .unwrap();
        assert_eq!(session.tokens_earned(), 8);
    }

    // Break journal tests

    #[test]
    fn start_break_force_closes_open_activity() {
        let mut session = test_session();
        session
            .start_activity("A", vec![], vec![], Rating::new(2))
            .unwrap();
        session.start_break(BreakKind::Requested).unwrap();

        assert_eq!(open_count(&session), 0);
        assert!(session.is_on_break());
        assert_eq!(session.open_break().unwrap().kind(), BreakKind::Requested);
        assert_eq!(session.activities()[0].notes(), ACTIVITY_PAUSED_NOTE);
        assert_eq!(session.activities()[0].tokens_earned(), 0);
    }

    #[test]
    fn second_start_break_is_ignored_while_one_is_open() {
        let mut session = test_session();
        session.start_break(BreakKind::Scheduled).unwrap();
        let result = session.start_break(BreakKind::Requested);
        assert_eq!(result, Err(IgnoreReason::BreakAlreadyOpen));
        assert_eq!(session.breaks().len(), 1);
    }

    #[test]
    fn close_break_ends_the_open_break() {
        let mut session = test_session();
        session.start_break(BreakKind::Scheduled).unwrap();
        session
            .close_break(Rating::new(4), Some("helped".to_string()))
            .unwrap();
        assert!(!session.is_on_break());
        assert_eq!(session.breaks()[0].effectiveness(), Rating::new(4));
        assert_eq!(session.breaks()[0].notes(), "helped");
    }

    #[test]
    fn close_break_without_open_break_is_ignored() {
        let mut session = test_session();
        assert_eq!(
            session.close_break(Rating::new(3), None),
            Err(IgnoreReason::NoOpenBreak)
        );
    }

    #[test]
    fn breaks_can_alternate_but_never_overlap() {
        let mut session = test_session();
        session.start_break(BreakKind::Scheduled).unwrap();
        session.close_break(Rating::new(3), None).unwrap();
        session.start_break(BreakKind::Requested).unwrap();
        assert_eq!(session.breaks().len(), 2);
        assert_eq!(
            session.breaks().iter().filter(|b| b.is_open()).count(),
            1
        );
    }

    // Intervention / achievement / sample tests

    #[test]
    fn intervention_requires_open_activity() {
        let mut session = test_session();
        assert_eq!(
            session.record_intervention(InterventionKind::Attention, Rating::new(3), None),
            Err(IgnoreReason::NoOpenActivity)
        );

        session
            .start_activity("Quest", vec![], vec![], Rating::new(2))
            .unwrap();
        session
            .record_intervention(InterventionKind::Attention, Rating::new(4), None)
            .unwrap();
        assert_eq!(session.open_activity().unwrap().interventions().len(), 1);
    }

    #[test]
    fn achievement_is_independent_of_activity_state() {
        let mut session = test_session();
        session
            .record_achievement(
                AchievementKind::Milestone,
                "finished first session",
                "gold star",
                None,
            )
            .unwrap();
        assert_eq!(session.achievements().len(), 1);
    }

    #[test]
    fn speech_sample_links_session_and_activity() {
        let mut session = test_session();
        session
            .start_activity("Quest", vec!["s".to_string()], vec![], Rating::new(2))
            .unwrap();
        let sample_id = session
            .record_speech_sample("s", "sun", "blob:rec-1", "sun", Assessment::default(), None)
            .unwrap();

        assert_eq!(session.speech_samples().len(), 1);
        let sample = &session.speech_samples()[0];
        assert_eq!(sample.session_id(), session.id());
        assert_eq!(
            sample.activity_id(),
            session.open_activity().unwrap().id()
        );
        assert_eq!(
            session.open_activity().unwrap().speech_sample_ids(),
            &[sample_id]
        );
    }

    #[test]
    fn speech_sample_requires_open_activity() {
        let mut session = test_session();
        let result =
            session.record_speech_sample("s", "sun", "blob:rec", "sun", Assessment::default(), None);
        assert_eq!(result, Err(IgnoreReason::NoOpenActivity));
    }

    // Session close tests

    #[test]
    fn complete_force_closes_open_activity_and_records_duration() {
        let mut session = test_session();
        session
            .start_activity("Quest", vec![], vec![], Rating::new(2))
            .unwrap();
        session.complete(12).unwrap();

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.actual_minutes(), 12);
        assert_eq!(open_count(&session), 0);
        assert_eq!(session.activities()[0].notes(), SESSION_ENDED_NOTE);
        assert_eq!(session.activities()[0].tokens_earned(), 0);
    }

    #[test]
    fn complete_twice_is_ignored() {
        let mut session = test_session();
        session.complete(5).unwrap();
        assert_eq!(session.complete(9), Err(IgnoreReason::SessionNotInProgress));
        assert_eq!(session.actual_minutes(), 5);
    }

    #[test]
    fn cancel_reaches_the_cancelled_terminal_status() {
        let mut session = test_session();
        session.cancel(3).unwrap();
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert_eq!(session.actual_minutes(), 3);
    }

    #[test]
    fn child_record_operations_are_ignored_after_completion() {
        let mut session = test_session();
        session.complete(10).unwrap();

        assert_eq!(
            session.start_activity("Quest", vec![], vec![], Rating::new(2)),
            Err(IgnoreReason::SessionNotInProgress)
        );
        assert_eq!(
            session.start_break(BreakKind::Requested),
            Err(IgnoreReason::SessionNotInProgress)
        );
        assert_eq!(
            session.record_achievement(AchievementKind::Engagement, "x", "y", None),
            Err(IgnoreReason::SessionNotInProgress)
        );
        assert!(session.activities().is_empty());
        assert!(session.breaks().is_empty());
        assert!(session.achievements().is_empty());
    }

    #[test]
    fn notes_stay_editable_after_completion() {
        let mut session = test_session();
        session.complete(10).unwrap();
        session.set_notes("wrap-up written after the session");
        assert_eq!(session.notes(), "wrap-up written after the session");
    }

    // Round-trip law

    #[test]
    fn aggregate_round_trips_through_json_unchanged() {
        let mut session = test_session();
        session
            .start_activity("Quest", vec!["s".to_string()], vec!["cluster reduction".to_string()], Rating::new(3))
            .unwrap();
        session
            .record_intervention(InterventionKind::Motivation, Rating::new(4), None)
            .unwrap();
        session
            .record_speech_sample("s", "star", "blob:rec-9", "tar", Assessment::default(), None)
            .unwrap();
        session
            .close_activity(Rating::new(5), Percentage::new(60), 2, None)
            .unwrap();
        session.start_break(BreakKind::Scheduled).unwrap();
        session
            .record_achievement(AchievementKind::SoundMastery, "s mastered", "sticker", None)
            .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let back: TherapySession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
