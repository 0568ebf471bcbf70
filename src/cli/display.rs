//! Display utilities for the Pomodorik CLI.
//!
//! This module provides formatted output for:
//! - The live countdown line
//! - Session start, completion and cancellation messages
//! - The durations table
//! - Error messages with suggestions

use std::cell::Cell;
use std::io::{self, Write};

use crate::indicator::format_clock;
use crate::types::{DurationTable, SessionKind};

// ============================================================================
// Display
// ============================================================================

/// Terminal output for the foreground countdown.
///
/// When stdout is not a terminal the per-second countdown line is skipped
/// and only session messages are printed. Messages first close an open
/// countdown line so they never land after its `\r`.
#[derive(Debug, Clone)]
pub struct Display {
    interactive: bool,
    line_open: Cell<bool>,
}

impl Display {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            line_open: Cell::new(false),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Shows the key bindings.
    pub fn show_key_help(&self) {
        self.end_countdown_line();
        println!("Keys: [Enter]/f focus, s short break, l long break, x cancel, q quit");
    }

    /// Shows that a session started.
    pub fn show_started(&self, kind: SessionKind, seconds: u32) {
        self.end_countdown_line();
        println!("{}", format_started(kind, seconds));
    }

    /// Rewrites the countdown line in place.
    pub fn show_remaining(&self, kind: SessionKind, seconds: u32) {
        if !self.interactive {
            return;
        }
        let mut stdout = io::stdout().lock();
        // A closed stdout only loses the countdown line.
        let _ = write!(stdout, "\r{}", format_countdown(kind, seconds));
        let _ = stdout.flush();
        self.line_open.set(true);
    }

    pub fn show_completed(&self, kind: SessionKind) {
        self.end_countdown_line();
        println!("* {} complete", kind);
    }

    pub fn show_cancelled(&self, kind: SessionKind) {
        self.end_countdown_line();
        println!("[] {} cancelled", kind);
    }

    /// Shows that there was nothing to cancel.
    pub fn show_idle(&self) {
        self.end_countdown_line();
        println!("No session is running");
    }

    fn end_countdown_line(&self) {
        if self.line_open.replace(false) {
            println!();
        }
    }

    /// Prints the named durations.
    pub fn show_durations(table: &DurationTable) {
        print!("{}", format_durations(table));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows a hint below an error.
    pub fn show_suggestion(suggestion: &str) {
        eprintln!("Hint: {}", suggestion);
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats the session start message.
pub fn format_started(kind: SessionKind, seconds: u32) -> String {
    format!("> {} started ({})", kind, format_clock(seconds))
}

/// Formats the live countdown line.
pub fn format_countdown(kind: SessionKind, seconds: u32) -> String {
    format!("{:<12}{}", kind.label(), format_clock(seconds))
}

/// Formats the durations table, one kind per line.
pub fn format_durations(table: &DurationTable) -> String {
    let mut out = format!("{:<14}{:<8}{}\n", "SESSION", "KEY", "DURATION");
    for kind in SessionKind::ALL {
        let seconds = table.seconds_for(kind);
        out.push_str(&format!(
            "{:<14}{:<8}{} ({}s)\n",
            kind.label(),
            kind.key(),
            format_clock(seconds),
            seconds
        ));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
