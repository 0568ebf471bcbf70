//! Observer contract between the session controller and its collaborators.
//!
//! Display, tray indicator, alert sound and screen-blanking inhibition all
//! plug in through [`SessionObserver`]. Hooks are invoked while the
//! controller holds its session lock, so implementations must not call back
//! into the controller.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

/// Receives session notifications.
///
/// Every method has a no-op default so collaborators only implement the
/// hooks they care about. A failing hook is logged by the controller and
/// never aborts the countdown.
pub trait SessionObserver: Send + Sync {
    /// Called on session start and on every tick with the seconds left.
    fn on_remaining_time_changed(&self, _seconds: u32) {}

    /// Called once per started session.
    fn on_session_started(&self) -> Result<()> {
        Ok(())
    }

    /// Called exactly once when a session reaches zero.
    fn on_session_completed(&self) -> Result<()> {
        Ok(())
    }

    /// Called when a running session is cancelled without completing.
    fn on_session_cancelled(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// ObserverSet
// ============================================================================

/// Fans every hook out to a list of observers.
///
/// All observers run even when an earlier one fails; the first error is
/// returned after the rest have been notified.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer, builder style.
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn push(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn dispatch(
        &self,
        hook: &'static str,
        call: impl Fn(&dyn SessionObserver) -> Result<()>,
    ) -> Result<()> {
        let mut first_error = None;
        for (index, observer) in self.observers.iter().enumerate() {
            if let Err(e) = call(observer.as_ref()) {
                warn!(hook, observer = index, error = %e, "Session observer failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl SessionObserver for ObserverSet {
    fn on_remaining_time_changed(&self, seconds: u32) {
        for observer in &self.observers {
            observer.on_remaining_time_changed(seconds);
        }
    }

    fn on_session_started(&self) -> Result<()> {
        self.dispatch("session_started", |o| o.on_session_started())
    }

    fn on_session_completed(&self) -> Result<()> {
        self.dispatch("session_completed", |o| o.on_session_completed())
    }

    fn on_session_cancelled(&self) -> Result<()> {
        self.dispatch("session_cancelled", |o| o.on_session_cancelled())
    }
}
