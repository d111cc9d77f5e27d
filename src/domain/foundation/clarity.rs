//! Clarity value object for speech-assessment scores (1-3 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Speech clarity on the 1-3 scale (low, medium, high), with 0 meaning
/// "not yet assessed". The default therapist assessment block holds zeros
/// until it is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clarity(u8);

impl Clarity {
    /// Not yet assessed.
    pub const UNRATED: Self = Self(0);

    /// Creates a new Clarity, clamping to the valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(3))
    }

    /// Creates a Clarity, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 3 {
            return Err(ValidationError::out_of_range("clarity", 0, 3, value as i32));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true once a real score (1-3) has been assigned.
    pub fn is_rated(&self) -> bool {
        self.0 > 0
    }
}

impl Default for Clarity {
    fn default() -> Self {
        Self::UNRATED
    }
}

impl fmt::Display for Clarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "unrated"),
            1 => write!(f, "low"),
            2 => write!(f, "medium"),
            _ => write!(f, "high"),
        }
    }
}
