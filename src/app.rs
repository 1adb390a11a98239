//! Lottery controller
//!
//! Owns one selector, one history log and one display surface, and is
//! passed explicitly to whatever event handlers need it. Timers stay with
//! the caller: `spin()` hands back the settling delay and the caller invokes
//! `finish_spin()` once it has elapsed.

use rand::Rng;

use crate::error::ConfigError;
use crate::history::HistoryLog;
use crate::platform::{ButtonState, DisplaySurface, Storage};
use crate::settings::Settings;
use crate::wheel::{Selector, Spin, WheelOption};

pub struct Lottery<S, D, R> {
    selector: Selector<R>,
    history: HistoryLog<S>,
    display: D,
    settings: Settings,
}

impl<S: Storage, D: DisplaySurface, R: Rng> Lottery<S, D, R> {
    /// Load the history and paint the initial idle state
    pub fn new(
        settings: Settings,
        options: Vec<WheelOption>,
        storage: S,
        display: D,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let settings = settings.sanitized();
        let selector = Selector::with_config(
            options,
            rng,
            settings.min_rotation_deg..settings.max_rotation_deg,
            settings.spin_duration_ms,
        )?;
        let history = HistoryLog::load_with(
            storage,
            crate::consts::HISTORY_STORAGE_KEY,
            settings.history_capacity,
        );

        let mut lottery = Self {
            selector,
            history,
            display,
            settings,
        };
        lottery.render_history();
        lottery.update_button();
        Ok(lottery)
    }

    /// Start a spin. `None` (and no display calls) while one is settling.
    pub fn spin(&mut self) -> Option<Spin> {
        let spin = self.selector.spin()?;
        self.update_button();
        self.display.rotate_to(spin.target, spin.duration_ms);
        Some(spin)
    }

    /// Resolve the settled spin: show it, record it, re-enable the trigger
    pub fn finish_spin(&mut self) -> Option<WheelOption> {
        let landed = self.selector.resolve()?;
        log::info!("Landed on {}", landed.value);

        self.display
            .show_result(&landed.value, self.settings.result_flash_ms);
        self.history.record(&landed.value);
        self.render_history();
        self.update_button();
        Some(landed)
    }

    /// Clear the history after the display surface confirms
    pub fn clear_history(&mut self) -> bool {
        let display = &mut self.display;
        let question = &self.settings.labels.clear_confirm;
        let cleared = self.history.clear_with(|| display.confirm(question));
        if cleared {
            self.render_history();
        }
        cleared
    }
}

impl<S, D: DisplaySurface, R> Lottery<S, D, R> {
    /// Page hidden/visible
    pub fn set_hidden(&mut self, hidden: bool) {
        self.display.set_paused(hidden);
    }

    /// Message to show if the user leaves while a spin is outstanding
    pub fn leave_warning(&self) -> Option<&str> {
        self.selector
            .is_spinning()
            .then_some(self.settings.labels.leave_warning.as_str())
    }

    pub fn is_spinning(&self) -> bool {
        self.selector.is_spinning()
    }

    pub fn selector(&self) -> &Selector<R> {
        &self.selector
    }

    pub fn history(&self) -> &HistoryLog<S> {
        &self.history
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn update_button(&mut self) {
        let labels = &self.settings.labels;
        let spinning = self.selector.is_spinning();
        let state = if spinning {
            ButtonState {
                disabled: true,
                text: labels.spin_busy.clone(),
                icon: labels.icon_busy.clone(),
            }
        } else {
            ButtonState {
                disabled: false,
                text: labels.spin_idle.clone(),
                icon: labels.icon_idle.clone(),
            }
        };
        self.display.set_button(&state, spinning);
    }
}

impl<S: Storage, D: DisplaySurface, R> Lottery<S, D, R> {
    fn render_history(&mut self) {
        let view = self.history.view(&self.settings.labels.history_empty);
        self.display.render_history(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryView;
    use crate::platform::MemoryStorage;
    use crate::wheel::reference_options;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Rotate(f64, u32),
        Button(bool),
        Result(String),
        History(HistoryView),
        Confirm(String),
        Paused(bool),
    }

    /// Display surface that records every call
    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
        answer: bool,
    }

    impl RecordingDisplay {
        fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl DisplaySurface for RecordingDisplay {
        fn rotate_to(&mut self, angle_deg: f64, duration_ms: u32) {
            self.calls.push(Call::Rotate(angle_deg, duration_ms));
        }

        fn set_button(&mut self, state: &ButtonState, spinning: bool) {
            assert_eq!(state.disabled, spinning);
            self.calls.push(Call::Button(spinning));
        }

        fn show_result(&mut self, value: &str, _flash_ms: u32) {
            self.calls.push(Call::Result(value.to_string()));
        }

        fn render_history(&mut self, view: &HistoryView) {
            self.calls.push(Call::History(view.clone()));
        }

        fn confirm(&mut self, message: &str) -> bool {
            self.calls.push(Call::Confirm(message.to_string()));
            self.answer
        }

        fn set_paused(&mut self, paused: bool) {
            self.calls.push(Call::Paused(paused));
        }
    }

    type TestLottery = Lottery<MemoryStorage, RecordingDisplay, Pcg32>;

    fn lottery_with(storage: MemoryStorage) -> TestLottery {
        Lottery::new(
            Settings::default(),
            reference_options(),
            storage,
            RecordingDisplay::default(),
            Pcg32::seed_from_u64(2024),
        )
        .unwrap()
    }

    fn empty_view() -> HistoryView {
        HistoryView::Empty {
            placeholder: "暂无记录".to_string(),
        }
    }

    #[test]
    fn test_startup_paints_idle_state() {
        let mut lottery = lottery_with(MemoryStorage::new());
        assert_eq!(
            lottery.display_mut().take(),
            vec![Call::History(empty_view()), Call::Button(false)]
        );
        assert!(lottery.leave_warning().is_none());
    }

    #[test]
    fn test_spin_then_finish() {
        let mut lottery = lottery_with(MemoryStorage::new());
        lottery.display_mut().take();

        let spin = lottery.spin().unwrap();
        assert_eq!(
            lottery.display_mut().take(),
            vec![Call::Button(true), Call::Rotate(spin.target, 4000)]
        );
        assert!(lottery.leave_warning().is_some());

        // Clicks during the settling delay do nothing
        assert!(lottery.spin().is_none());
        assert!(lottery.display_mut().take().is_empty());

        let landed = lottery.finish_spin().unwrap();
        let calls = lottery.display_mut().take();
        assert_eq!(calls[0], Call::Result(landed.value.clone()));
        assert!(matches!(&calls[1], Call::History(HistoryView::Rows(rows)) if rows[0].result == landed.value));
        assert_eq!(calls[2], Call::Button(false));

        assert_eq!(lottery.history().latest().unwrap().result, landed.value);
        assert!(!lottery.is_spinning());

        // Nothing pending any more
        assert!(lottery.finish_spin().is_none());
        assert_eq!(lottery.history().len(), 1);
    }

    #[test]
    fn test_landed_option_matches_resting_angle() {
        let mut lottery = lottery_with(MemoryStorage::new());
        for _ in 0..12 {
            lottery.spin().unwrap();
            let index = lottery.selector().landed_index();
            let landed = lottery.finish_spin().unwrap();
            assert_eq!(landed, reference_options()[index]);
        }
        assert_eq!(lottery.history().len(), 12);
    }

    #[test]
    fn test_clear_history_confirmation() {
        let mut lottery = lottery_with(MemoryStorage::new());

        // Empty history never asks
        assert!(!lottery.clear_history());
        lottery.spin().unwrap();
        lottery.finish_spin().unwrap();
        lottery.display_mut().take();

        lottery.display_mut().answer = false;
        assert!(!lottery.clear_history());
        assert_eq!(
            lottery.display_mut().take(),
            vec![Call::Confirm("确定要清空所有历史记录吗？".to_string())]
        );
        assert_eq!(lottery.history().len(), 1);

        lottery.display_mut().answer = true;
        assert!(lottery.clear_history());
        let calls = lottery.display_mut().take();
        assert_eq!(calls.last(), Some(&Call::History(empty_view())));
        assert!(lottery.history().is_empty());
    }

    #[test]
    fn test_history_survives_restart() {
        let mut lottery = lottery_with(MemoryStorage::new());
        for _ in 0..3 {
            lottery.spin().unwrap();
            lottery.finish_spin().unwrap();
        }
        let before = lottery.history().entries().to_vec();
        let storage = lottery.history().storage().clone();

        let restarted = lottery_with(storage);
        assert_eq!(restarted.history().entries(), &before[..]);
    }

    #[test]
    fn test_visibility_pauses_display() {
        let mut lottery = lottery_with(MemoryStorage::new());
        lottery.display_mut().take();
        lottery.set_hidden(true);
        lottery.set_hidden(false);
        assert_eq!(
            lottery.display_mut().take(),
            vec![Call::Paused(true), Call::Paused(false)]
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let result = Lottery::new(
            Settings::default(),
            Vec::new(),
            MemoryStorage::new(),
            RecordingDisplay::default(),
            Pcg32::seed_from_u64(1),
        );
        assert!(matches!(result, Err(ConfigError::NoOptions)));
    }
}
