//! Screen-blanking inhibition configuration.

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Default inhibitor command for the current platform.
///
/// The command must keep running until killed; the inhibition lasts as long
/// as the process lives.
#[must_use]
pub fn default_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["caffeinate".to_string(), "-d".to_string()]
    } else {
        [
            "systemd-inhibit",
            "--what=idle",
            "--who=pomodorik",
            "--why=Focus session running",
            "sleep",
            "infinity",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
    }
}

/// Inhibition settings.
///
/// # Example
///
/// ```
/// use pomodorik::inhibit::InhibitConfig;
///
/// let config = InhibitConfig::default();
/// assert!(config.enabled);
/// assert!(!config.command.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InhibitConfig {
    /// Whether to inhibit screen blanking while a session runs.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Program and arguments of the inhibitor process.
    #[serde(default = "default_command")]
    pub command: Vec<String>,
}

impl Default for InhibitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_command(),
        }
    }
}

impl InhibitConfig {
    /// Creates a configuration with a custom command.
    #[must_use]
    pub fn with_command<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// Program name, if any.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }
}
