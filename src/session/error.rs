//! Session controller error types.

use thiserror::Error;

/// Errors returned by the session controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session must last at least one second.
    #[error("session duration must be at least one second")]
    ZeroDuration,
}

impl SessionError {
    /// Returns a user-facing hint for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ZeroDuration => "pass a positive --seconds value or fix the durations config",
        }
    }
}
