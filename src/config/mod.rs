//! Application configuration.
//!
//! Settings are read from a JSON file: the `--config` path, or
//! `<config_dir>/pomodorik/config.json`. Every field has a default, so a
//! partial file (or no file at all) is valid.
//!
//! ```json
//! {
//!   "durations": { "focus": 1500, "short_break": 300, "long_break": 900 },
//!   "sound": { "enabled": true, "volume": 3.0, "file": "/path/to/alert.ogg" },
//!   "inhibit": { "enabled": false }
//! }
//! ```

pub mod error;

pub use error::ConfigError;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inhibit::InhibitConfig;
use crate::sound::SoundSource;
use crate::types::DurationTable;

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "pomodorik";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_sound_enabled() -> bool {
    true
}

/// Alert gain. Matches a 2^1.6 boost of the decoded samples.
fn default_volume() -> f32 {
    3.0
}

/// Alert sound settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Whether to play a sound on completion.
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,

    /// Linear gain applied to the alert.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Audio file to play instead of the built-in chime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            volume: default_volume(),
            file: None,
        }
    }
}

impl SoundConfig {
    /// Resolves the configured alert source.
    #[must_use]
    pub fn source(&self) -> SoundSource {
        match &self.file {
            Some(path) => SoundSource::file(path),
            None => SoundSource::Chime,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub durations: DurationTable,

    #[serde(default)]
    pub sound: SoundConfig,

    #[serde(default)]
    pub inhibit: InhibitConfig,
}

impl AppConfig {
    /// Default config file location, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. When no path is given, the default
    /// location is used and a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> error::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file without validating it.
    pub fn from_file(path: &Path) -> error::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> error::Result<()> {
        self.durations.validate().map_err(ConfigError::Invalid)?;

        if !self.sound.volume.is_finite() || self.sound.volume < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sound volume must be a non-negative number, got {}",
                self.sound.volume
            )));
        }
        Ok(())
    }
}
