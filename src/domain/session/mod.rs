//! Session domain module.
//!
//! The practice-session aggregate and its child records, plus the
//! journal rules that keep the single-open-entity invariants true:
//! starting a new activity, starting a break, or ending the session all
//! route through the one shared force-close rule.

mod activity;
mod aggregate;
mod outcome;
mod records;

pub use activity::{Activity, Intervention, InterventionKind};
pub use aggregate::{
    TherapySession, ACTIVITY_PAUSED_NOTE, ACTIVITY_SUPERSEDED_NOTE, SESSION_ENDED_NOTE,
};
pub use outcome::{IgnoreReason, OpOutcome};
pub use records::{Achievement, AchievementKind, Assessment, Break, BreakKind, SpeechSample};
