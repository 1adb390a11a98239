//! Display surface
//!
//! Everything the core tells the presentation layer. The core never reads
//! back from it except for `confirm`.

use crate::history::HistoryView;

/// Trigger control appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub disabled: bool,
    pub text: String,
    pub icon: String,
}

/// Presentation collaborator driven by [`crate::Lottery`]
pub trait DisplaySurface {
    /// Animate the wheel to an absolute rotation (degrees, clockwise)
    fn rotate_to(&mut self, angle_deg: f64, duration_ms: u32);

    /// Reflect the selector's spinning flag on the trigger control
    fn set_button(&mut self, state: &ButtonState, spinning: bool);

    /// Show the landed value; `flash_ms` is how long result effects last
    fn show_result(&mut self, value: &str, flash_ms: u32);

    /// Replace the rendered history
    fn render_history(&mut self, view: &HistoryView);

    /// Blocking yes/no question for destructive actions
    fn confirm(&mut self, message: &str) -> bool;

    /// Pause/resume ambient animation (page hidden/visible)
    fn set_paused(&mut self, _paused: bool) {}
}
