//! Rating value object for 1-5 score scales.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A score on the 1-5 scale used for engagement, effectiveness, and
/// difficulty, with 0 meaning "not yet rated".
///
/// Open records carry `Rating::UNRATED` until they are closed or assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Not yet rated.
    pub const UNRATED: Self = Self(0);

    /// Midpoint of the scale; assigned when an activity is force-closed.
    pub const MODERATE: Self = Self(3);

    /// Creates a new Rating, clamping to the valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(5))
    }

    /// Creates a Rating, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 5 {
            return Err(ValidationError::out_of_range("rating", 0, 5, value as i32));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true once a real score (1-5) has been assigned.
    pub fn is_rated(&self) -> bool {
        self.0 > 0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::UNRATED
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rated() {
            write!(f, "{}/5", self.0)
        } else {
            write!(f, "unrated")
        }
    }
}
