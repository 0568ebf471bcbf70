//! Updates sent from the session side to the indicator renderer.

use super::icon::IconState;

/// One change to the indicator.
///
/// Produced by [`super::TrayIndicator`] on the tick task and consumed on the
/// foreground loop by [`super::TitleRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorUpdate {
    /// Replace the title text
    SetTitle(String),
    /// Switch the icon
    SetIcon(IconState),
    /// Ask for the user's attention (raise the window)
    RequestFocus,
}

impl IndicatorUpdate {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorUpdate::SetTitle(_) => "set_title",
            IndicatorUpdate::SetIcon(_) => "set_icon",
            IndicatorUpdate::RequestFocus => "request_focus",
        }
    }
}
