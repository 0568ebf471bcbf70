//! Completion alert sound for Pomodorik.
//!
//! This module provides audio notification capabilities, including:
//!
//! - A built-in synthesized chime and optional user-supplied sound files
//! - Non-blocking playback on a dedicated audio thread, with a flush so the
//!   process can let an alert finish before exiting
//! - Graceful degradation when audio is unavailable
//! - [`SoundAlert`], the session observer that plays on completion
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │    SoundAlert    │────▶│   SoundPlayer    │────▶│   audio thread   │
//! │ (SessionObserver)│     │ (Rodio or Mock)  │     │ (rodio stream)   │
//! └──────────────────┘     └──────────────────┘     └──────────────────┘
//! ```

mod error;
mod player;
mod source;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{chime, decode, load_file, BoxedSource, SoundSource};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::SessionObserver;

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer: Send + Sync {
    /// Plays a sound from the given source without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Blocks until queued sounds have finished, at most `timeout`.
    ///
    /// Returns false if something was still playing at the deadline.
    fn wait_idle(&self, timeout: Duration) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        RodioSoundPlayer::wait_idle(self, timeout)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
    wait_calls: AtomicUsize,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn wait_idle_count(&self) -> usize {
        self.wait_calls.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(source.clone());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn wait_idle(&self, _timeout: Duration) -> bool {
        self.wait_calls.fetch_add(1, Ordering::SeqCst);
        true
    }
}

// ============================================================================
// SoundAlert
// ============================================================================

/// Session observer that plays the alert when a session completes.
pub struct SoundAlert {
    player: Arc<dyn SoundPlayer>,
    source: SoundSource,
}

impl SoundAlert {
    pub fn new(player: Arc<dyn SoundPlayer>, source: SoundSource) -> Self {
        Self { player, source }
    }

    pub fn source(&self) -> &SoundSource {
        &self.source
    }

    /// Lets an alert that is already playing run to the end.
    ///
    /// Returns false if it was cut off by `timeout`.
    pub fn wait_for_playback(&self, timeout: Duration) -> bool {
        self.player.wait_idle(timeout)
    }
}

impl std::fmt::Debug for SoundAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundAlert")
            .field("source", &self.source)
            .field("disabled", &self.player.is_disabled())
            .finish()
    }
}

impl SessionObserver for SoundAlert {
    fn on_session_completed(&self) -> Result<()> {
        self.player
            .play(&self.source)
            .with_context(|| format!("Failed to play alert '{}'", self.source.name()))
    }
}
