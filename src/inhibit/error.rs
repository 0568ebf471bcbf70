//! Screen-blanking inhibition error types.
//!
//! Every error here is recoverable: the countdown keeps running when the
//! inhibitor cannot be started.

use thiserror::Error;

/// Errors that can occur while holding or releasing an inhibitor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InhibitError {
    /// The configured command is empty.
    #[error("inhibit command is empty")]
    EmptyCommand,

    /// The inhibitor program is not installed.
    #[error("inhibitor program '{0}' not found")]
    CommandNotFound(String),

    /// The inhibitor program could not be started.
    #[error("failed to start inhibitor '{0}': {1}")]
    SpawnFailed(String, String),

    /// The inhibitor process could not be stopped.
    #[error("failed to stop inhibitor '{0}': {1}")]
    ReleaseFailed(String, String),
}

impl InhibitError {
    /// Returns true if the inhibitor program is missing.
    #[must_use]
    pub fn is_command_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound(_))
    }

    /// Returns true if this error happened while acquiring.
    #[must_use]
    pub fn is_acquire_error(&self) -> bool {
        !matches!(self, Self::ReleaseFailed(_, _))
    }

    /// Returns true if the countdown should continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::EmptyCommand => "set inhibit.command in the config or pass --no-inhibit",
            Self::CommandNotFound(_) => {
                "install the inhibitor program, change inhibit.command, or pass --no-inhibit"
            }
            Self::SpawnFailed(_, _) => "run the inhibit command by hand to see why it fails",
            Self::ReleaseFailed(_, _) => "stop the leftover inhibitor process manually",
        }
    }
}
