//! Application configuration module.
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the
//! `SPEECH_COMPANION_` prefix and nested sections use double underscores
//! as separators, e.g. `SPEECH_COMPANION_SESSION__DEFAULT_DURATION_MINS=30`.
//!
//! # Example
//!
//! ```no_run
//! use speech_companion::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! println!("session blob at {}", config.storage.data_dir.display());
//! ```

mod error;
mod session;
mod storage;

pub use error::ConfigError;
pub use session::SessionConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Storage locations (data directory, blob key).
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session duration defaults.
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Loads configuration from the environment (and a `.env` file when
    /// present), then validates it.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SPEECH_COMPANION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: AppConfig = raw.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session.default_duration_mins, 45);
        assert_eq!(cfg.storage.session_key, "speech_therapy_current_session");
    }

    #[test]
    fn validate_rejects_a_bad_section() {
        let mut cfg = AppConfig::default();
        cfg.session.min_duration_mins = 90;
        assert!(cfg.validate().is_err());
    }
}
