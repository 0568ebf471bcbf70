//! Always-visible session indicator.
//!
//! This module provides:
//! - `TrayIndicator`: a session observer that publishes indicator updates
//! - `TitleRenderer`: drains those updates on the foreground loop and
//!   renders them as terminal title escape sequences
//!
//! # Architecture
//!
//! Hooks fire on the tick task while the controller holds its session lock,
//! so the observer only queues work. Updates cross to the foreground over a
//! crossbeam channel.
//!
//! ```text
//! tick task                          foreground loop
//! ┌──────────────┐  IndicatorUpdate  ┌───────────────┐
//! │ TrayIndicator│ ────────────────▶ │ TitleRenderer │ ──▶ "\x1b]0;🍅 Pomodorik (19:59)\x07"
//! └──────────────┘   (crossbeam)     └───────────────┘
//! ```

pub mod event;
pub mod icon;

pub use event::IndicatorUpdate;
pub use icon::{decorate_title, format_clock, tray_title, IconManager, IconState, APP_NAME};

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::session::SessionObserver;

// ============================================================================
// TrayIndicator
// ============================================================================

/// Publishes indicator updates for session notifications.
#[derive(Debug, Clone)]
pub struct TrayIndicator {
    update_tx: Sender<IndicatorUpdate>,
}

impl TrayIndicator {
    /// Creates an indicator and the receiving end of its update channel.
    pub fn channel() -> (Self, Receiver<IndicatorUpdate>) {
        let (update_tx, update_rx) = unbounded();
        (Self { update_tx }, update_rx)
    }

    fn send(&self, update: IndicatorUpdate) -> Result<()> {
        let name = update.name();
        self.update_tx
            .send(update)
            .with_context(|| format!("Indicator channel closed while sending {}", name))
    }
}

impl SessionObserver for TrayIndicator {
    fn on_remaining_time_changed(&self, seconds: u32) {
        if let Err(e) = self.send(IndicatorUpdate::SetTitle(tray_title(seconds))) {
            tracing::debug!(error = %e, "Dropped indicator title update");
        }
    }

    fn on_session_started(&self) -> Result<()> {
        self.send(IndicatorUpdate::SetIcon(IconState::Active))
    }

    fn on_session_completed(&self) -> Result<()> {
        self.send(IndicatorUpdate::SetIcon(IconState::Idle))?;
        self.send(IndicatorUpdate::RequestFocus)
    }

    fn on_session_cancelled(&self) -> Result<()> {
        self.send(IndicatorUpdate::SetIcon(IconState::Idle))
    }
}

// ============================================================================
// TitleRenderer
// ============================================================================

/// Renders indicator updates as terminal title escape sequences.
pub struct TitleRenderer<W: Write> {
    update_rx: Receiver<IndicatorUpdate>,
    writer: W,
    icon_manager: IconManager,
    icon: IconState,
    title: String,
}

impl<W: Write> TitleRenderer<W> {
    pub fn new(update_rx: Receiver<IndicatorUpdate>, writer: W) -> Self {
        Self {
            update_rx,
            writer,
            icon_manager: IconManager::new(),
            icon: IconState::Idle,
            title: APP_NAME.to_string(),
        }
    }

    /// Current title including the icon glyph.
    pub fn current_title(&self) -> String {
        decorate_title(self.icon, &self.title)
    }

    pub fn icon(&self) -> IconState {
        self.icon
    }

    /// Processes one pending update.
    ///
    /// Returns `Ok(true)` if an update was processed, `Ok(false)` if the
    /// channel was empty or disconnected.
    pub fn process_pending_update(&mut self) -> io::Result<bool> {
        match self.update_rx.try_recv() {
            Ok(update) => {
                self.handle_update(update)?;
                Ok(true)
            }
            Err(TryRecvError::Empty) => Ok(false),
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("Indicator update channel disconnected");
                Ok(false)
            }
        }
    }

    /// Processes every pending update and returns how many were handled.
    pub fn drain(&mut self) -> io::Result<usize> {
        let mut handled = 0;
        while self.process_pending_update()? {
            handled += 1;
        }
        Ok(handled)
    }

    /// Restores the plain application title.
    pub fn reset(&mut self) -> io::Result<()> {
        self.icon = IconState::Idle;
        self.title = APP_NAME.to_string();
        self.render(APP_NAME)
    }

    fn handle_update(&mut self, update: IndicatorUpdate) -> io::Result<()> {
        match update {
            IndicatorUpdate::SetTitle(title) => {
                self.title = title;
            }
            IndicatorUpdate::SetIcon(icon) => {
                self.icon = icon;
            }
            IndicatorUpdate::RequestFocus => {
                // BEL: terminals raise or flag the window.
                self.writer.write_all(b"\x07")?;
                return self.writer.flush();
            }
        }
        let title = self.current_title();
        self.render(&title)
    }

    /// Writes the title escape unless the terminal already shows `title`.
    fn render(&mut self, title: &str) -> io::Result<()> {
        if !self.icon_manager.title_changed(title) {
            tracing::trace!(title, "Title unchanged, skipping write");
            return Ok(());
        }
        write!(self.writer, "\x1b]0;{}\x07", title)?;
        self.writer.flush()
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> std::fmt::Debug for TitleRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRenderer")
            .field("icon", &self.icon)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
