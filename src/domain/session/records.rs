//! Break, achievement, and speech-sample records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AchievementId, ActivityId, BreakId, Clarity, Percentage, Rating, SampleId, SessionId,
    Timestamp,
};

/// Why a break was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    Scheduled,
    Requested,
    Emergency,
}

/// A pause within a session. At most one break is open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    id: BreakId,
    session_id: SessionId,
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
    duration_secs: u64,
    kind: BreakKind,
    effectiveness: Rating,
    notes: String,
}

impl Break {
    pub(crate) fn open(session_id: SessionId, kind: BreakKind) -> Self {
        Self {
            id: BreakId::new(),
            session_id,
            started_at: Timestamp::now(),
            ended_at: None,
            duration_secs: 0,
            kind,
            effectiveness: Rating::UNRATED,
            notes: String::new(),
        }
    }

    /// Closes the break, stamping the end time and computed duration.
    pub(crate) fn close(&mut self, effectiveness: Rating, notes: Option<String>) {
        let ended = Timestamp::now();
        self.duration_secs = ended.seconds_since(&self.started_at);
        self.ended_at = Some(ended);
        self.effectiveness = effectiveness;
        if let Some(notes) = notes {
            self.notes = notes;
        }
    }

    /// Returns true while the break has not been closed.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn id(&self) -> &BreakId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
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

    pub fn kind(&self) -> BreakKind {
        self.kind
    }

    pub fn effectiveness(&self) -> Rating {
        self.effectiveness
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Kind of milestone reached during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    SoundMastery,
    PatternImprovement,
    Engagement,
    Milestone,
}

/// A logged milestone, independent of activity open/closed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    id: AchievementId,
    session_id: SessionId,
    kind: AchievementKind,
    description: String,
    at: Timestamp,
    reward: String,
    notes: String,
}

impl Achievement {
    pub(crate) fn record(
        session_id: SessionId,
        kind: AchievementKind,
        description: String,
        reward: String,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: AchievementId::new(),
            session_id,
            kind,
            description,
            at: Timestamp::now(),
            reward,
            notes: notes.unwrap_or_default(),
        }
    }

    pub fn id(&self) -> &AchievementId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn kind(&self) -> AchievementKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn at(&self) -> &Timestamp {
        &self.at
    }

    pub fn reward(&self) -> &str {
        &self.reward
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Assessment scores for one speech sample.
///
/// The machine block is produced by the (out-of-scope) assessment
/// collaborator and treated as opaque here; the therapist block holds
/// zeros until it is overwritten by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub recognized: bool,
    pub clarity: Clarity,
    pub accuracy: Percentage,
    pub notes: String,
}

/// One recorded practice attempt, owned by the session and linked from
/// the activity it was produced in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSample {
    id: SampleId,
    session_id: SessionId,
    activity_id: ActivityId,
    target_sound: String,
    target_word: String,
    recording_ref: String,
    transcription: String,
    machine: Assessment,
    therapist: Assessment,
    at: Timestamp,
}

impl SpeechSample {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        session_id: SessionId,
        activity_id: ActivityId,
        target_sound: String,
        target_word: String,
        recording_ref: String,
        transcription: String,
        machine: Assessment,
        therapist: Option<Assessment>,
    ) -> Self {
        Self {
            id: SampleId::new(),
            session_id,
            activity_id,
            target_sound,
            target_word,
            recording_ref,
            transcription,
            machine,
            therapist: therapist.unwrap_or_default(),
            at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &SampleId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    pub fn target_sound(&self) -> &str {
        &self.target_sound
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn recording_ref(&self) -> &str {
        &self.recording_ref
    }

    pub fn transcription(&self) -> &str {
        &self.transcription
    }

    pub fn machine(&self) -> &Assessment {
        &self.machine
    }

    pub fn therapist(&self) -> &Assessment {
        &self.therapist
    }

    pub fn at(&self) -> &Timestamp {
        &self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_break_is_open_and_unrated() {
        let brk = Break::open(SessionId::new(), BreakKind::Requested);
        assert!(brk.is_open());
        assert_eq!(brk.kind(), BreakKind::Requested);
        assert_eq!(brk.effectiveness(), Rating::UNRATED);
        assert_eq!(brk.duration_secs(), 0);
    }

    #[test]
    fn closed_break_keeps_kind_and_scores() {
        let mut brk = Break::open(SessionId::new(), BreakKind::Emergency);
        brk.close(Rating::new(5), Some("calmed down quickly".to_string()));
        assert!(!brk.is_open());
        assert_eq!(brk.effectiveness(), Rating::new(5));
        assert_eq!(brk.notes(), "calmed down quickly");
    }

    #[test]
    fn break_kind_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&BreakKind::Scheduled).unwrap(),
            "\"scheduled\""
        );
    }

    #[test]
    fn achievement_records_description_and_reward() {
        let achievement = Achievement::record(
            SessionId::new(),
            AchievementKind::SoundMastery,
            "mastered initial s".to_string(),
            "dragon sticker".to_string(),
            None,
        );
        assert_eq!(achievement.kind(), AchievementKind::SoundMastery);
        assert_eq!(achievement.description(), "mastered initial s");
        assert_eq!(achievement.reward(), "dragon sticker");
        assert_eq!(achievement.notes(), "");
    }

    #[test]
    fn achievement_kind_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&AchievementKind::PatternImprovement).unwrap(),
            "\"pattern_improvement\""
        );
    }

    #[test]
    fn default_assessment_is_all_zeros() {
        let assessment = Assessment::default();
        assert!(!assessment.recognized);
        assert!(!assessment.clarity.is_rated());
        assert_eq!(assessment.accuracy, Percentage::ZERO);
        assert_eq!(assessment.notes, "");
    }

    #[test]
    fn sample_defaults_therapist_block_to_zeros() {
        let machine = Assessment {
            recognized: true,
            clarity: Clarity::new(2),
            accuracy: Percentage::new(85),
            notes: "good attempt".to_string(),
        };
        let sample = SpeechSample::record(
            SessionId::new(),
            ActivityId::new(),
            "s".to_string(),
            "sun".to_string(),
            "blob:rec-1".to_string(),
            "sun".to_string(),
            machine.clone(),
            None,
        );
        assert_eq!(sample.machine(), &machine);
        assert_eq!(sample.therapist(), &Assessment::default());
    }

    #[test]
    fn sample_keeps_supplied_therapist_block() {
        let therapist = Assessment {
            recognized: true,
            clarity: Clarity::new(3),
            accuracy: Percentage::new(90),
            notes: "clearer than the machine heard".to_string(),
        };
        let sample = SpeechSample::record(
            SessionId::new(),
            ActivityId::new(),
            "r".to_string(),
            "roar".to_string(),
            "blob:rec-2".to_string(),
            "roah".to_string(),
            Assessment::default(),
            Some(therapist.clone()),
        );
        assert_eq!(sample.therapist(), &therapist);
    }
}
