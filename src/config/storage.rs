//! Storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ConfigError;

/// Where the persisted blobs live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted blobs.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key for the current-session blob.
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_session_key() -> String {
    "speech_therapy_current_session".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_key: default_session_key(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_key.is_empty() {
            return Err(ConfigError::invalid("session key cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_matches_the_storage_contract() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.session_key, "speech_therapy_current_session");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_key_fails_validation() {
        let cfg = StorageConfig {
            data_dir: PathBuf::from("./data"),
            session_key: String::new(),
        };
        assert!(cfg.validate().is_err());
    }
}
