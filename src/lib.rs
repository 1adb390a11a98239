//! Lottery Wheel - a spinning prize wheel with a persisted draw history
//!
//! Core modules:
//! - `wheel`: Option set, sector geometry and the spin/resolve selector
//! - `history`: Bounded, newest-first draw log persisted to storage
//! - `settings`: Timing, capacity and UI text, persisted separately
//! - `platform`: Storage and display surface abstractions (browser/native)
//! - `app`: Wires a selector, a history log and a display surface together

pub mod app;
pub mod error;
pub mod history;
pub mod platform;
pub mod settings;
pub mod wheel;

pub use app::Lottery;
pub use error::{ConfigError, StorageError};
pub use history::{HistoryEntry, HistoryLog, HistoryView};
pub use settings::{Labels, Settings};
pub use wheel::{Selector, Spin, WheelOption, WheelState};

/// Reference configuration constants
pub mod consts {
    /// Full turn in degrees
    pub const FULL_TURN: f64 = 360.0;

    /// Smallest random spin delta (3 full turns)
    pub const MIN_ROTATION_DEG: f64 = 1080.0;
    /// Upper bound (exclusive) of the random spin delta (5 full turns)
    pub const MAX_ROTATION_DEG: f64 = 1800.0;

    /// Rotation animation length; the result resolves when it ends
    pub const SPIN_DURATION_MS: u32 = 4000;
    /// Result bounce / button glow length
    pub const RESULT_FLASH_MS: u32 = 800;
    /// Two touchends closer than this are treated as a double-tap zoom
    pub const DOUBLE_TAP_WINDOW_MS: u32 = 300;

    /// Draws kept in the history log
    pub const HISTORY_CAPACITY: usize = 20;
    /// Storage key for the serialized history
    pub const HISTORY_STORAGE_KEY: &str = "lottery_history";
    /// Storage key for the serialized settings
    pub const SETTINGS_STORAGE_KEY: &str = "lottery_settings";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= consts::FULL_TURN { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(1125.0), 45.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);
    }
}
