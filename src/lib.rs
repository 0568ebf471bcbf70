//! Pomodorik Library
//!
//! This library provides the core functionality for the Pomodorik timer.
//! It includes:
//! - Countdown engine running a cancellable once-per-second tick source
//! - Session controller owning the single session and its observers
//! - Terminal-title indicator showing the remaining time
//! - Completion alert sound
//! - Screen-blanking inhibition while a session runs
//! - Configuration loading and CLI parsing/display

pub mod cli;
pub mod config;
pub mod countdown;
pub mod indicator;
pub mod inhibit;
pub mod session;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{DurationTable, SessionKind, SessionPhase, SessionSnapshot, MAX_SESSION_SECONDS};

pub use countdown::{CountdownEngine, TickHandle, DEFAULT_TICK_PERIOD};

pub use session::{
    EventForwarder, ObserverSet, SessionController, SessionError, SessionEvent, SessionObserver,
};

pub use config::{AppConfig, ConfigError, SoundConfig};

// Re-export indicator types
pub use indicator::{format_clock, IconState, IndicatorUpdate, TitleRenderer, TrayIndicator};

// Re-export sound types
pub use sound::{
    try_create_player, MockSoundPlayer, RodioSoundPlayer, SoundAlert, SoundError, SoundPlayer,
    SoundSource,
};

// Re-export inhibit types
pub use inhibit::{
    CommandInhibitor, IdleInhibitor, InhibitConfig, InhibitError, Inhibitor, MockInhibitor,
};
