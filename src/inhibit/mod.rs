//! Screen-blanking inhibition while a session runs.
//!
//! The desktop must not blank the screen or lock while a countdown is
//! visible. An inhibitor process (`caffeinate -d` on macOS,
//! `systemd-inhibit` elsewhere) is held from session start until the
//! session completes or is cancelled.
//!
//! # Error Handling
//!
//! All errors in this module are recoverable; the countdown continues even
//! if the inhibitor is missing. See [`InhibitError::is_recoverable`].

pub mod config;
pub mod error;
pub mod process;

pub use config::{default_command, InhibitConfig};
pub use error::InhibitError;
pub use process::CommandInhibitor;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::session::SessionObserver;

/// Acquires and releases screen-blanking inhibition.
///
/// Both operations are idempotent.
pub trait Inhibitor: Send + Sync {
    fn acquire(&self) -> Result<(), InhibitError>;
    fn release(&self) -> Result<(), InhibitError>;
    fn is_held(&self) -> bool;
}

// ============================================================================
// IdleInhibitor
// ============================================================================

/// Session observer that holds an inhibitor while a session runs.
pub struct IdleInhibitor {
    inhibitor: Arc<dyn Inhibitor>,
}

impl IdleInhibitor {
    pub fn new(inhibitor: Arc<dyn Inhibitor>) -> Self {
        Self { inhibitor }
    }

    /// Creates an observer backed by the configured command.
    pub fn from_config(config: &InhibitConfig) -> Self {
        Self::new(Arc::new(CommandInhibitor::new(config)))
    }

    pub fn is_held(&self) -> bool {
        self.inhibitor.is_held()
    }

    fn release(&self) -> Result<()> {
        self.inhibitor
            .release()
            .context("Failed to release screen-blanking inhibition")
    }
}

impl std::fmt::Debug for IdleInhibitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleInhibitor")
            .field("held", &self.inhibitor.is_held())
            .finish()
    }
}

impl SessionObserver for IdleInhibitor {
    fn on_session_started(&self) -> Result<()> {
        self.inhibitor
            .acquire()
            .context("Failed to inhibit screen blanking")
    }

    fn on_session_completed(&self) -> Result<()> {
        self.release()
    }

    fn on_session_cancelled(&self) -> Result<()> {
        self.release()
    }
}

// ============================================================================
// MockInhibitor
// ============================================================================

/// In-memory inhibitor for tests.
#[derive(Debug, Default)]
pub struct MockInhibitor {
    held: AtomicBool,
    acquire_calls: AtomicUsize,
    release_calls: AtomicUsize,
    should_fail_acquire: AtomicBool,
}

impl MockInhibitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail_acquire(&self, should_fail: bool) {
        self.should_fail_acquire.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn acquire_call_count(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn release_call_count(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

impl Inhibitor for MockInhibitor {
    fn acquire(&self) -> Result<(), InhibitError> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail_acquire.load(Ordering::SeqCst) {
            return Err(InhibitError::CommandNotFound("mock".to_string()));
        }
        self.held.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) -> Result<(), InhibitError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}
