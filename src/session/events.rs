//! Session events for the foreground loop.
//!
//! [`EventForwarder`] turns observer hooks into [`SessionEvent`]s on a tokio
//! channel, so async code can await completion instead of being called back
//! from the tick task.

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use super::observer::SessionObserver;

/// Session notifications as values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session started
    Started,
    /// Remaining time changed (start or tick)
    RemainingChanged {
        /// Seconds left
        remaining_seconds: u32,
    },
    /// The session reached zero
    Completed,
    /// The session was cancelled before reaching zero
    Cancelled,
}

impl SessionEvent {
    /// Returns true for events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::Completed | SessionEvent::Cancelled)
    }
}

/// Observer forwarding every hook to an unbounded channel.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventForwarder {
    /// Creates a forwarder and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { event_tx }, event_rx)
    }

    fn send(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .with_context(|| format!("Failed to send {:?} event", event))
    }
}

impl SessionObserver for EventForwarder {
    fn on_remaining_time_changed(&self, seconds: u32) {
        // Nobody listening is not an error for a display update.
        let _ = self.send(SessionEvent::RemainingChanged {
            remaining_seconds: seconds,
        });
    }

    fn on_session_started(&self) -> Result<()> {
        self.send(SessionEvent::Started)
    }

    fn on_session_completed(&self) -> Result<()> {
        self.send(SessionEvent::Completed)
    }

    fn on_session_cancelled(&self) -> Result<()> {
        self.send(SessionEvent::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(SessionEvent::Completed.is_terminal());
        assert!(SessionEvent::Cancelled.is_terminal());
        assert!(!SessionEvent::Started.is_terminal());
        assert!(!SessionEvent::RemainingChanged {
            remaining_seconds: 0
        }
        .is_terminal());
    }

    #[test]
    fn test_forwards_hooks_in_order() {
        let (forwarder, mut rx) = EventForwarder::channel();

        forwarder.on_remaining_time_changed(5);
        forwarder.on_session_started().unwrap();
        forwarder.on_session_completed().unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::RemainingChanged {
                remaining_seconds: 5
            }
        );
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Started);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Completed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_reports_error() {
        let (forwarder, rx) = EventForwarder::channel();
        drop(rx);

        forwarder.on_remaining_time_changed(1);
        let err = forwarder.on_session_completed().unwrap_err();
        assert!(err.to_string().contains("Completed"));
    }
}
