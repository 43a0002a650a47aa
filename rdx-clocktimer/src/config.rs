//! Defines all configuration structures for the clocktimer engine.
//!
//! These structs are deserialized with `serde` from layered sources assembled
//! by the `config` crate: built-in defaults, then an optional TOML file, then
//! `CLOCKTIMER__`-prefixed environment variables. Nested keys use a double
//! underscore, e.g. `CLOCKTIMER__ALERT__SOUND_ENABLED=false`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "clocktimer";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CLOCKTIMER";

/// The top-level configuration for the `ClockTimerEngine`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockTimerConfig {
    /// Cadence of both the clock ticker and the countdown ticker.
    pub tick_interval_ms: u64,

    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// How the presentation layer renders the clock.
    pub display: DisplayConfig,

    /// Completion and rejection alert settings.
    pub alert: AlertConfig,
}

/// Clock rendering options.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Render the clock as `hh:MM:SS AM/PM` instead of 24-hour time.
    pub hour12: bool,
    /// Render the long date line under the clock.
    pub show_date: bool,
}

/// Settings for the completion side effect and user-facing rejections.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// The fixed sound asset referenced by the audio sink.
    pub sound_path: PathBuf,
    pub sound_enabled: bool,
    /// Playback volume in percent.
    pub volume: u8,
    pub title: String,
    pub message: String,
    pub invalid_title: String,
    pub invalid_message: String,
}

impl Default for ClockTimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            log_level: "info".to_string(),
            display: DisplayConfig::default(),
            alert: AlertConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hour12: true,
            show_date: true,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sound_path: PathBuf::from("alarm.mp3"),
            sound_enabled: true,
            volume: 100,
            title: "Timer Complete!".to_string(),
            message: "Your timer has finished.".to_string(),
            invalid_title: "Invalid Time".to_string(),
            invalid_message: "Please set a time greater than zero.".to_string(),
        }
    }
}

impl ClockTimerConfig {
    /// Loads the configuration from defaults, an optional file and the environment.
    ///
    /// An explicit `path` must exist; without one, `clocktimer.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|source| ConfigError::Load { source })?;
        Self::finish(settings)
    }

    /// Parses a TOML document layered over the defaults, ignoring the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()
            .map_err(|source| ConfigError::Load { source })?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self, ConfigError> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|source| ConfigError::Load { source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "tick_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The cadence shared by both tickers.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ClockTimerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClockTimerConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.alert.title, "Timer Complete!");
    }

    #[test]
    fn nested_tables_override_individual_fields() {
        let config = ClockTimerConfig::from_toml_str(
            r#"
            log_level = "debug"

            [display]
            hour12 = false

            [alert]
            sound_enabled = false
            message = "Tea is ready."
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(!config.display.hour12);
        assert!(config.display.show_date);
        assert!(!config.alert.sound_enabled);
        assert_eq!(config.alert.message, "Tea is ready.");
        assert_eq!(config.alert.title, "Timer Complete!");
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let err = ClockTimerConfig::from_toml_str("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn environment_overrides_nested_and_top_level_keys() {
        std::env::set_var("CLOCKTIMER__ALERT__SOUND_ENABLED", "false");
        std::env::set_var("CLOCKTIMER__ALERT__VOLUME", "35");
        std::env::set_var("CLOCKTIMER__TICK_INTERVAL_MS", "250");
        let loaded = ClockTimerConfig::load(None);
        std::env::remove_var("CLOCKTIMER__ALERT__SOUND_ENABLED");
        std::env::remove_var("CLOCKTIMER__ALERT__VOLUME");
        std::env::remove_var("CLOCKTIMER__TICK_INTERVAL_MS");

        let config = loaded.unwrap();
        assert!(!config.alert.sound_enabled);
        assert_eq!(config.alert.volume, 35);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.alert.title, "Timer Complete!");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = ClockTimerConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }
}
