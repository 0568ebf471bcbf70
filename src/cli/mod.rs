//! CLI module for Pomodorik.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive, plus keyboard commands
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, KeyCommand, StartArgs};
pub use display::Display;
