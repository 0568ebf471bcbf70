//! Command definitions for the Pomodorik CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{DurationTable, SessionKind, MAX_SESSION_SECONDS};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodorik - a single-countdown focus timer
#[derive(Parser, Debug)]
#[command(
    name = "pomodorik",
    version,
    about = "A single-countdown focus timer",
    long_about = "Runs one focus or break countdown at a time in the terminal.\n\
                  Starting a new session replaces the running one.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a countdown in the foreground
    Start(StartArgs),

    /// Show the named session durations
    Durations {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Session to start first
    #[arg(value_enum, default_value_t = SessionKind::Focus)]
    pub kind: SessionKind,

    /// Override the first session's duration in seconds (1-86400)
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SESSION_SECONDS as i64)
    )]
    pub seconds: Option<u32>,

    /// Exit after the first session ends
    #[arg(long)]
    pub once: bool,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Do not inhibit screen blanking while a session runs
    #[arg(long)]
    pub no_inhibit: bool,
}

impl StartArgs {
    /// Duration of the first session, honoring `--seconds`.
    #[must_use]
    pub fn first_duration(&self, durations: &DurationTable) -> u32 {
        self.seconds
            .unwrap_or_else(|| durations.seconds_for(self.kind))
    }
}

// ============================================================================
// Keyboard commands
// ============================================================================

/// A line typed while the countdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Start (or restart with) a session
    Start(SessionKind),
    /// Cancel the running session
    Cancel,
    /// Leave the program
    Quit,
}

impl KeyCommand {
    /// Parses one input line. An empty line starts a focus session.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => Some(Self::Start(SessionKind::Focus)),
            "x" | "cancel" => Some(Self::Cancel),
            "q" | "quit" => Some(Self::Quit),
            other => other.parse().ok().map(Self::Start),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
