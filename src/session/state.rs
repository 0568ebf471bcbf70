//! The session record owned by the controller.

use crate::types::{SessionPhase, SessionSnapshot};

/// Result of applying one tick to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down; carries the new remaining time.
    Remaining(u32),
    /// Reached zero on this tick.
    Completed,
}

/// One countdown run.
///
/// `generation` increases on every [`Session::begin`] so a tick delivered
/// by a superseded tick source can be recognised and dropped.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    duration_seconds: u32,
    remaining_seconds: u32,
    generation: u64,
}

impl Session {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the session to a fresh run of `duration_seconds`.
    ///
    /// Returns the generation of the new run.
    pub fn begin(&mut self, duration_seconds: u32) -> u64 {
        self.generation += 1;
        self.phase = SessionPhase::Running;
        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.generation
    }

    /// Applies one tick.
    ///
    /// Returns `None` when the session is not running. The remaining time
    /// never drops below zero; the tick that reaches zero completes the run.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.phase.is_running() {
            return None;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }

        if self.remaining_seconds == 0 {
            self.phase = SessionPhase::Completed;
            Some(TickOutcome::Completed)
        } else {
            Some(TickOutcome::Remaining(self.remaining_seconds))
        }
    }

    /// Returns the session to idle. Returns true if it was running.
    pub fn cancel(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        true
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copies the observable fields.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            duration_seconds: self.duration_seconds,
            remaining_seconds: self.remaining_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_begin_resets() {
        let mut session = Session::new();
        let first = session.begin(300);
        session.tick();

        let second = session.begin(600);
        assert!(second > first);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.duration_seconds(), 600);
        assert_eq!(session.remaining_seconds(), 600);
    }

    #[test]
    fn test_tick_counts_down_to_completion() {
        let mut session = Session::new();
        session.begin(3);

        assert_eq!(session.tick(), Some(TickOutcome::Remaining(2)));
        assert_eq!(session.tick(), Some(TickOutcome::Remaining(1)));
        assert_eq!(session.tick(), Some(TickOutcome::Completed));
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_tick_after_completion_is_ignored() {
        let mut session = Session::new();
        session.begin(1);
        assert_eq!(session.tick(), Some(TickOutcome::Completed));

        assert_eq!(session.tick(), None);
        assert_eq!(session.remaining_seconds(), 0);
    }

    #[test]
    fn test_tick_when_idle_is_ignored() {
        let mut session = Session::new();
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn test_remaining_stays_within_bounds() {
        for duration in [1, 2, 7, 60] {
            let mut session = Session::new();
            session.begin(duration);
            for _ in 0..duration + 5 {
                session.tick();
                assert!(session.remaining_seconds() <= session.duration_seconds());
            }
            assert_eq!(session.remaining_seconds(), 0);
        }
    }

    #[test]
    fn test_cancel() {
        let mut session = Session::new();
        assert!(!session.cancel());

        let generation = session.begin(10);
        session.tick();
        assert!(session.cancel());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_ne!(session.generation(), generation);
        assert!(!session.cancel());
    }

    #[test]
    fn test_snapshot() {
        let mut session = Session::new();
        session.begin(5);
        session.tick();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Running);
        assert_eq!(snapshot.duration_seconds, 5);
        assert_eq!(snapshot.remaining_seconds, 4);
    }
}
