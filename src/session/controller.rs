//! Session controller.
//!
//! The authoritative state machine over a single [`Session`]:
//! - Idle → Running on `start_session`
//! - Running → Completed when the countdown reaches zero
//! - Running → Idle on `cancel_session`
//! - Completed/Idle → Running on the next `start_session`
//!
//! The session lives behind a mutex shared with the tick callback.
//! `start_session` holds that lock while it stops the old tick source,
//! resets the session and starts the new one, so a late tick from the old
//! source sees a stale generation and exits without side effects.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::countdown::CountdownEngine;
use crate::types::SessionSnapshot;

use super::error::SessionError;
use super::observer::SessionObserver;
use super::state::{Session, TickOutcome};

// ============================================================================
// SessionController
// ============================================================================

/// Drives one countdown session at a time and notifies an observer.
pub struct SessionController {
    engine: CountdownEngine,
    session: Arc<Mutex<Session>>,
    observer: Arc<dyn SessionObserver>,
}

impl SessionController {
    /// Creates a controller ticking once per second.
    pub fn new(observer: Arc<dyn SessionObserver>) -> Self {
        Self::with_engine(CountdownEngine::new(), observer)
    }

    /// Creates a controller on top of a custom engine.
    pub fn with_engine(engine: CountdownEngine, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            engine,
            session: Arc::new(Mutex::new(Session::new())),
            observer,
        }
    }

    /// Starts a new session, replacing any running one.
    ///
    /// The interrupted session gets no completion side effects. The observer
    /// sees the new remaining time before the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ZeroDuration`] if `duration_seconds` is zero;
    /// the current session is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start_session(&self, duration_seconds: u32) -> Result<(), SessionError> {
        if duration_seconds == 0 {
            return Err(SessionError::ZeroDuration);
        }

        let mut session = lock(&self.session);

        if session.phase().is_running() {
            debug!(
                remaining_seconds = session.remaining_seconds(),
                "Restarting: stopping previous tick source"
            );
            self.engine.stop();
        }

        let generation = session.begin(duration_seconds);
        info!(generation, duration_seconds, "Session started");

        self.observer.on_remaining_time_changed(duration_seconds);
        if let Err(e) = self.observer.on_session_started() {
            warn!(generation, error = %e, "Session-started side effect failed");
        }

        let tick_session = Arc::clone(&self.session);
        let observer = Arc::clone(&self.observer);
        self.engine
            .start(move || on_tick(&tick_session, observer.as_ref(), generation));

        Ok(())
    }

    /// Cancels the running session without completion side effects.
    ///
    /// Returns false, and does nothing observable, when no session is running.
    pub fn cancel_session(&self) -> bool {
        let mut session = lock(&self.session);

        if !session.cancel() {
            debug!("Cancel requested while idle, ignoring");
            return false;
        }
        self.engine.stop();
        info!(
            remaining_seconds = session.remaining_seconds(),
            "Session cancelled"
        );

        if let Err(e) = self.observer.on_session_cancelled() {
            warn!(error = %e, "Session-cancelled side effect failed");
        }
        true
    }

    /// Returns a copy of the current session.
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    /// Returns true while a tick source is running.
    pub fn is_ticking(&self) -> bool {
        self.engine.is_active()
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("engine", &self.engine)
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Handles one tick for the session run identified by `generation`.
fn on_tick(
    session: &Mutex<Session>,
    observer: &dyn SessionObserver,
    generation: u64,
) -> ControlFlow<()> {
    let mut session = lock(session);

    if session.generation() != generation {
        debug!(generation, "Dropping tick from superseded session");
        return ControlFlow::Break(());
    }

    let Some(outcome) = session.tick() else {
        return ControlFlow::Break(());
    };

    observer.on_remaining_time_changed(session.remaining_seconds());

    match outcome {
        TickOutcome::Remaining(_) => ControlFlow::Continue(()),
        TickOutcome::Completed => {
            info!(generation, "Session completed");
            if let Err(e) = observer.on_session_completed() {
                warn!(generation, error = %e, "Session-completed side effect failed");
            }
            ControlFlow::Break(())
        }
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Tests
// ============================================================================
