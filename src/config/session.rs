//! Session defaults configuration.

use serde::Deserialize;

use super::error::ConfigError;

/// Session duration defaults, in minutes.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Planned length used when a session is started without one.
    #[serde(default = "default_duration_mins")]
    pub default_duration_mins: u32,

    /// Shortest planned length a session may be configured with.
    #[serde(default = "default_min_duration_mins")]
    pub min_duration_mins: u32,

    /// Longest planned length a session may be configured with.
    #[serde(default = "default_max_duration_mins")]
    pub max_duration_mins: u32,
}

fn default_duration_mins() -> u32 {
    45
}

fn default_min_duration_mins() -> u32 {
    15
}

fn default_max_duration_mins() -> u32 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_mins: default_duration_mins(),
            min_duration_mins: default_min_duration_mins(),
            max_duration_mins: default_max_duration_mins(),
        }
    }
}

impl SessionConfig {
    /// Checks that the duration bounds are ordered and contain the default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_duration_mins > self.max_duration_mins {
            return Err(ConfigError::invalid(format!(
                "min duration ({} min) exceeds max duration ({} min)",
                self.min_duration_mins, self.max_duration_mins
            )));
        }
        if self.default_duration_mins < self.min_duration_mins
            || self.default_duration_mins > self.max_duration_mins
        {
            return Err(ConfigError::invalid(format!(
                "default duration ({} min) is outside {}-{} min",
                self.default_duration_mins, self.min_duration_mins, self.max_duration_mins
            )));
        }
        Ok(())
    }
}
