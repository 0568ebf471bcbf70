//! Core data types for Pomodorik.
//!
//! This module defines the data structures used for:
//! - Session phases of the countdown state machine
//! - Named session kinds and their duration lookup table
//! - Read-only session snapshots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// SessionPhase
// ============================================================================

/// Represents the current phase of the countdown session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session has run yet, or the last one was cancelled
    #[default]
    Idle,
    /// Counting down, a tick source is active
    Running,
    /// Reached zero and fired its completion side effects
    Completed,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Running => "running",
            SessionPhase::Completed => "completed",
        }
    }

    /// Returns true if the countdown is ticking.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionPhase::Running)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SessionKind
// ============================================================================

/// Named session types offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Focused work session
    #[value(alias = "tomato")]
    Focus,
    /// Short break
    #[value(name = "short")]
    ShortBreak,
    /// Long break
    #[value(name = "long")]
    LongBreak,
}

impl SessionKind {
    /// All kinds in menu order.
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Focus,
        SessionKind::ShortBreak,
        SessionKind::LongBreak,
    ];

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus",
            SessionKind::ShortBreak => "Short break",
            SessionKind::LongBreak => "Long break",
        }
    }

    /// Returns the short key used on the command line and in the keyboard loop.
    pub fn key(&self) -> &'static str {
        match self {
            SessionKind::Focus => "focus",
            SessionKind::ShortBreak => "short",
            SessionKind::LongBreak => "long",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "tomato" | "f" => Ok(SessionKind::Focus),
            "short" | "short_break" | "s" => Ok(SessionKind::ShortBreak),
            "long" | "long_break" | "l" => Ok(SessionKind::LongBreak),
            other => Err(format!("unknown session kind: {other}")),
        }
    }
}

// ============================================================================
// DurationTable
// ============================================================================

/// Longest accepted session (24 hours).
pub const MAX_SESSION_SECONDS: u32 = 24 * 60 * 60;

fn default_focus() -> u32 {
    1200
}

fn default_short_break() -> u32 {
    300
}

fn default_long_break() -> u32 {
    600
}

/// Maps each [`SessionKind`] to its duration in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationTable {
    /// Focus duration in seconds
    #[serde(default = "default_focus")]
    pub focus: u32,
    /// Short break duration in seconds
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    /// Long break duration in seconds
    #[serde(default = "default_long_break")]
    pub long_break: u32,
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl DurationTable {
    /// Resolves a session kind to seconds.
    pub fn seconds_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Focus => self.focus,
            SessionKind::ShortBreak => self.short_break,
            SessionKind::LongBreak => self.long_break,
        }
    }

    /// Validates the table.
    ///
    /// Returns an error message naming the first out-of-range entry.
    pub fn validate(&self) -> Result<(), String> {
        for kind in SessionKind::ALL {
            let seconds = self.seconds_for(kind);
            if seconds == 0 || seconds > MAX_SESSION_SECONDS {
                return Err(format!(
                    "{} duration must be between 1 and {} seconds, got {}",
                    kind.key(),
                    MAX_SESSION_SECONDS,
                    seconds
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Read-only copy of the controller's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Current phase
    pub phase: SessionPhase,
    /// Duration the session started with
    pub duration_seconds: u32,
    /// Seconds left
    pub remaining_seconds: u32,
}

// ============================================================================
// Tests
// ============================================================================
