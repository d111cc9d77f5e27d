//! SessionStatus enum for tracking the lifecycle of practice sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a practice session.
///
/// Transitions only move forward: Scheduled -> InProgress ->
/// {Completed, Cancelled}. Persisted blobs use the kebab-case strings
/// (`"in-progress"` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns true while the session accepts child-record operations.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Scheduled, InProgress) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<SessionStatus> {
        use SessionStatus::*;
        match self {
            Scheduled => vec![InProgress],
            InProgress => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}
