//! Countdown module for Pomodorik.
//!
//! This module contains the tick source:
//! - `engine`: recurring one-second callback on a background tokio task,
//!   with idempotent cooperative cancellation

pub mod engine;

pub use engine::{CountdownEngine, TickHandle, DEFAULT_TICK_PERIOD};
