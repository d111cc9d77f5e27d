//! Activity and intervention records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActivityId, InterventionId, Percentage, Rating, SampleId, SessionId, Timestamp,
};

/// Kind of corrective action applied during an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    Attention,
    Motivation,
    Difficulty,
    Reset,
}

/// A corrective action logged while its parent activity was open.
/// Write-once: appended, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    id: InterventionId,
    activity_id: ActivityId,
    kind: InterventionKind,
    at: Timestamp,
    effectiveness: Rating,
    notes: String,
}

impl Intervention {
    pub(crate) fn record(
        activity_id: ActivityId,
        kind: InterventionKind,
        effectiveness: Rating,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: InterventionId::new(),
            activity_id,
            kind,
            at: Timestamp::now(),
            effectiveness,
            notes: notes.unwrap_or_default(),
        }
    }

    pub fn id(&self) -> &InterventionId {
        &self.id
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    pub fn kind(&self) -> InterventionKind {
        self.kind
    }

    pub fn at(&self) -> &Timestamp {
        &self.at
    }

    pub fn effectiveness(&self) -> Rating {
        self.effectiveness
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// One timed practice task within a session.
///
/// # Invariants
///
/// - At most one activity per session is open (`ended_at == None`)
/// - Scored fields stay at their unrated defaults until close
/// - `duration_secs` is the whole-second difference end − start, set at close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    session_id: SessionId,
    kind: String,
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
    duration_secs: u64,
    difficulty: Rating,
    target_sounds: Vec<String>,
    target_patterns: Vec<String>,
    engagement: Rating,
    success_rate: Percentage,
    tokens_earned: u32,
    interventions: Vec<Intervention>,
    speech_sample_ids: Vec<SampleId>,
    notes: String,
}

impl Activity {
    pub(crate) fn open(
        session_id: SessionId,
        kind: String,
        target_sounds: Vec<String>,
        target_patterns: Vec<String>,
        difficulty: Rating,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            session_id,
            kind,
            started_at: Timestamp::now(),
            ended_at: None,
            duration_secs: 0,
            difficulty,
            target_sounds,
            target_patterns,
            engagement: Rating::UNRATED,
            success_rate: Percentage::ZERO,
            tokens_earned: 0,
            interventions: Vec::new(),
            speech_sample_ids: Vec::new(),
            notes: String::new(),
        }
    }

    /// Closes the activity, stamping the end time and computed duration.
    ///
    /// Absent notes leave any existing notes in place.
    pub(crate) fn close(
        &mut self,
        engagement: Rating,
        success_rate: Percentage,
        tokens_earned: u32,
        notes: Option<String>,
    ) {
        let ended = Timestamp::now();
        self.duration_secs = ended.seconds_since(&self.started_at);
        self.ended_at = Some(ended);
        self.engagement = engagement;
        self.success_rate = success_rate;
        self.tokens_earned = tokens_earned;
        if let Some(notes) = notes {
            self.notes = notes;
        }
    }

    pub(crate) fn push_intervention(&mut self, intervention: Intervention) {
        self.interventions.push(intervention);
    }

    pub(crate) fn link_sample(&mut self, sample_id: SampleId) {
        self.speech_sample_ids.push(sample_id);
    }

    /// Returns true while the activity has not been closed.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn difficulty(&self) -> Rating {
        self.difficulty
    }

    pub fn target_sounds(&self) -> &[String] {
        &self.target_sounds
    }

    pub fn target_patterns(&self) -> &[String] {
        &self.target_patterns
    }

    pub fn engagement(&self) -> Rating {
        self.engagement
    }

    pub fn success_rate(&self) -> Percentage {
        self.success_rate
    }

    pub fn tokens_earned(&self) -> u32 {
        self.tokens_earned
    }

    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    pub fn speech_sample_ids(&self) -> &[SampleId] {
        &self.speech_sample_ids
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}
