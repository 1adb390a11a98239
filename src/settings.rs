//! Wheel settings and UI text
//!
//! Persisted separately from the history in storage. Every field has a
//! default, so partial documents load fine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::Storage;

/// Text shown by the display surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Trigger text while idle
    pub spin_idle: String,
    /// Trigger text while a spin settles
    pub spin_busy: String,
    pub icon_idle: String,
    pub icon_busy: String,
    /// History placeholder when no draws exist
    pub history_empty: String,
    /// Question asked before clearing the history
    pub clear_confirm: String,
    /// Warning when leaving the page mid-spin
    pub leave_warning: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            spin_idle: "开始抽签".to_string(),
            spin_busy: "抽签中...".to_string(),
            icon_idle: "🎲".to_string(),
            icon_busy: "⏳".to_string(),
            history_empty: "暂无记录".to_string(),
            clear_confirm: "确定要清空所有历史记录吗？".to_string(),
            leave_warning: "抽签正在进行中，确定要离开吗？".to_string(),
        }
    }
}

/// Wheel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Spin ===
    /// Rotation animation length, also the settling delay before resolve
    pub spin_duration_ms: u32,
    /// Smallest random spin delta in degrees
    pub min_rotation_deg: f64,
    /// Exclusive upper bound of the random spin delta
    pub max_rotation_deg: f64,

    // === History ===
    /// Draws kept, newest first
    pub history_capacity: usize,

    // === Effects ===
    /// Result bounce / button glow length
    pub result_flash_ms: u32,

    // === Touch ===
    /// Touchends closer than this are swallowed (double-tap zoom)
    pub double_tap_window_ms: u32,

    pub labels: Labels,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spin_duration_ms: SPIN_DURATION_MS,
            min_rotation_deg: MIN_ROTATION_DEG,
            max_rotation_deg: MAX_ROTATION_DEG,
            history_capacity: HISTORY_CAPACITY,
            result_flash_ms: RESULT_FLASH_MS,
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            labels: Labels::default(),
        }
    }
}

impl Settings {
    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let range_ok = self.min_rotation_deg.is_finite()
            && self.max_rotation_deg.is_finite()
            && self.min_rotation_deg > 0.0
            && self.min_rotation_deg < self.max_rotation_deg;
        if !range_ok {
            log::warn!(
                "Invalid rotation range [{}, {}), using defaults",
                self.min_rotation_deg,
                self.max_rotation_deg
            );
            self.min_rotation_deg = defaults.min_rotation_deg;
            self.max_rotation_deg = defaults.max_rotation_deg;
        }

        if self.history_capacity == 0 {
            log::warn!("History capacity 0, using {}", defaults.history_capacity);
            self.history_capacity = defaults.history_capacity;
        }

        self
    }

    /// Load settings from storage, falling back to defaults
    pub fn load<S: Storage>(storage: &S) -> Self {
        match storage.get(SETTINGS_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save<S: Storage>(&self, storage: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set(SETTINGS_STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::platform::MemoryStorage;

    /// Storage whose reads and writes always fail
    struct UnreadableStorage;

    impl Storage for UnreadableStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("window.localStorage".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("window.localStorage".to_string()))
        }
    }

    #[test]
    fn test_defaults_match_reference() {
        let s = Settings::default();
        assert_eq!(s.spin_duration_ms, 4000);
        assert_eq!(s.min_rotation_deg, 1080.0);
        assert_eq!(s.max_rotation_deg, 1800.0);
        assert_eq!(s.history_capacity, 20);
        assert_eq!(s.result_flash_ms, 800);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let storage =
            MemoryStorage::with_item(SETTINGS_STORAGE_KEY, r#"{"spin_duration_ms": 2500}"#);
        let s = Settings::load(&storage);
        assert_eq!(s.spin_duration_ms, 2500);
        assert_eq!(s.history_capacity, 20);
        assert_eq!(s.labels, Labels::default());
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let storage = MemoryStorage::with_item(SETTINGS_STORAGE_KEY, "{oops");
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_unreadable_storage_falls_back() {
        assert_eq!(Settings::load(&UnreadableStorage), Settings::default());
        // Failed save is logged, not propagated
        Settings::default().save(&mut UnreadableStorage);
    }

    #[test]
    fn test_sanitized() {
        let s = Settings {
            min_rotation_deg: 1800.0,
            max_rotation_deg: 1080.0,
            history_capacity: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.min_rotation_deg, MIN_ROTATION_DEG);
        assert_eq!(s.max_rotation_deg, MAX_ROTATION_DEG);
        assert_eq!(s.history_capacity, HISTORY_CAPACITY);
    }

    #[test]
    fn test_save_load() {
        let mut storage = MemoryStorage::new();
        let mut s = Settings::default();
        s.labels.spin_idle = "Spin".to_string();
        s.save(&mut storage);
        assert_eq!(Settings::load(&storage), s);
    }
}
