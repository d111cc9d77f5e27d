//! Outcome contract for lifecycle operations.
//!
//! Operations called against a missing structural precondition (no open
//! session, activity, or break where one is required) have no effect and
//! raise no error. `OpOutcome` names that policy so callers can observe
//! it instead of guessing.

use std::fmt;

/// Why a lifecycle operation had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No session has been started (or adopted from storage).
    NoCurrentSession,
    /// The current session is not in progress; child-record operations
    /// on a completed or cancelled session are ignored.
    SessionNotInProgress,
    /// The operation needs an open activity and none is open.
    NoOpenActivity,
    /// The operation needs an open break and none is open.
    NoOpenBreak,
    /// A break is already open; at most one break may be open at a time.
    BreakAlreadyOpen,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IgnoreReason::NoCurrentSession => "no current session",
            IgnoreReason::SessionNotInProgress => "session is not in progress",
            IgnoreReason::NoOpenActivity => "no open activity",
            IgnoreReason::NoOpenBreak => "no open break",
            IgnoreReason::BreakAlreadyOpen => "a break is already open",
        };
        write!(f, "{}", s)
    }
}

/// Result of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// The mutation was applied and queued for persistence.
    Applied,
    /// The structural precondition was unmet; nothing changed.
    Ignored(IgnoreReason),
}

impl OpOutcome {
    /// Returns true if the mutation took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, OpOutcome::Applied)
    }

    /// Returns true if the call was a no-op.
    pub fn is_ignored(&self) -> bool {
        !self.is_applied()
    }

    /// Returns the ignore reason, if the call was a no-op.
    pub fn ignore_reason(&self) -> Option<IgnoreReason> {
        match self {
            OpOutcome::Applied => None,
            OpOutcome::Ignored(reason) => Some(*reason),
        }
    }
}

impl From<IgnoreReason> for OpOutcome {
    fn from(reason: IgnoreReason) -> Self {
        OpOutcome::Ignored(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_is_not_ignored() {
        assert!(OpOutcome::Applied.is_applied());
        assert!(!OpOutcome::Applied.is_ignored());
        assert_eq!(OpOutcome::Applied.ignore_reason(), None);
    }

    #[test]
    fn ignored_exposes_its_reason() {
        let outcome = OpOutcome::Ignored(IgnoreReason::NoOpenActivity);
        assert!(outcome.is_ignored());
        assert_eq!(outcome.ignore_reason(), Some(IgnoreReason::NoOpenActivity));
    }

    #[test]
    fn reason_converts_into_ignored_outcome() {
        let outcome: OpOutcome = IgnoreReason::BreakAlreadyOpen.into();
        assert_eq!(outcome, OpOutcome::Ignored(IgnoreReason::BreakAlreadyOpen));
    }

    #[test]
    fn reasons_display_as_short_phrases() {
        assert_eq!(
            format!("{}", IgnoreReason::SessionNotInProgress),
            "session is not in progress"
        );
        assert_eq!(format!("{}", IgnoreReason::NoOpenBreak), "no open break");
    }
}
