//! Session control for Pomodorik.
//!
//! This module contains the countdown state machine:
//! - `controller`: start/cancel semantics over a single session
//! - `state`: the session record and its tick rule
//! - `observer`: the callback contract used by display, tray, sound and
//!   screen-blanking collaborators
//! - `events`: an observer that forwards notifications to a channel
//! - `error`: controller errors

pub mod controller;
pub mod error;
pub mod events;
pub mod observer;
pub mod state;

pub use controller::SessionController;
pub use error::SessionError;
pub use events::{EventForwarder, SessionEvent};
pub use observer::{ObserverSet, SessionObserver};
pub use state::{Session, TickOutcome};
