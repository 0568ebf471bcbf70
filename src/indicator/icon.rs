//! Icon and title generation for the always-visible indicator.
//!
//! This module handles:
//! - Zero-padded `MM:SS` clock text
//! - The indicator title (e.g., "Pomodorik (19:59)")
//! - Active/idle icon state
//! - Skipping title writes that would not change the title
//!
//! Everything here is platform-independent and fully testable.

// ============================================================================
// Constants
// ============================================================================

/// Application name shown in titles and tooltips.
pub const APP_NAME: &str = "Pomodorik";

/// Glyph shown while a session is running
const ACTIVE_GLYPH: &str = "🍅";

/// Glyph shown while idle
const IDLE_GLYPH: &str = "⏸";

// ============================================================================
// IconState
// ============================================================================

/// Which icon the indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconState {
    /// A session is counting down
    Active,
    /// No session is running
    #[default]
    Idle,
}

impl IconState {
    /// Returns the glyph for this state.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconState::Active => ACTIVE_GLYPH,
            IconState::Idle => IDLE_GLYPH,
        }
    }
}

// ============================================================================
// IconManager
// ============================================================================

/// Remembers the last rendered title so redraws happen only on change.
#[derive(Debug, Default)]
pub struct IconManager {
    last_title: Option<String>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_title: None }
    }

    /// Records `title` and returns true if it differs from the last one.
    pub fn title_changed(&mut self, title: &str) -> bool {
        if self.last_title.as_deref() == Some(title) {
            return false;
        }
        self.last_title = Some(title.to_string());
        true
    }
}

/// Prefixes a title with the glyph of `state`.
pub fn decorate_title(state: IconState, title: &str) -> String {
    format!("{} {}", state.glyph(), title)
}

/// Formats seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so 6000 seconds renders as "100:00".
pub fn format_clock(remaining_seconds: u32) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Title text carrying the remaining time, e.g. "Pomodorik (05:00)".
pub fn tray_title(remaining_seconds: u32) -> String {
    format!("{} ({})", APP_NAME, format_clock(remaining_seconds))
}

// ============================================================================
// Tests
// ============================================================================
