//! Spin selector
//!
//! Two-phase operation:
//! 1. `spin()` draws a random delta, fixes the absolute target and the
//!    normalized resting angle immediately.
//! 2. `resolve()` runs once the settling delay elapses and reads the
//!    option under the pointer.
//!
//! The scheduler between the two phases belongs to the caller, so tests
//! can resolve instantly.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::option::WheelOption;
use super::sector::{sector_angle, sector_index};
use crate::consts::{MAX_ROTATION_DEG, MIN_ROTATION_DEG, SPIN_DURATION_MS};
use crate::error::ConfigError;
use crate::normalize_degrees;

/// Observable wheel state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelState {
    /// Resting angle in degrees, always in [0, 360)
    pub current_angle: f64,
    /// True between a successful `spin()` and its `resolve()`
    pub spinning: bool,
}

/// An accepted spin request, for the display surface to animate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Degrees added by this spin
    pub delta: f64,
    /// Absolute rotation to animate to; strictly greater than the previous
    /// target because `spin_by` only accepts finite positive deltas
    pub target: f64,
    /// Animation / settling delay length
    pub duration_ms: u32,
}

/// Draws spins and maps the landed angle to an option
#[derive(Debug, Clone)]
pub struct Selector<R> {
    options: Vec<WheelOption>,
    state: WheelState,
    /// Unnormalized rotation handed to the display; congruent to `current_angle`
    rotation: f64,
    range: Range<f64>,
    duration_ms: u32,
    rng: R,
}

impl<R: Rng> Selector<R> {
    /// Selector with the reference rotation range and duration
    pub fn new(options: Vec<WheelOption>, rng: R) -> Result<Self, ConfigError> {
        Self::with_config(
            options,
            rng,
            MIN_ROTATION_DEG..MAX_ROTATION_DEG,
            SPIN_DURATION_MS,
        )
    }

    pub fn with_config(
        options: Vec<WheelOption>,
        rng: R,
        range: Range<f64>,
        duration_ms: u32,
    ) -> Result<Self, ConfigError> {
        if options.is_empty() {
            return Err(ConfigError::NoOptions);
        }
        let valid = range.start.is_finite()
            && range.end.is_finite()
            && range.start > 0.0
            && range.start < range.end;
        if !valid {
            return Err(ConfigError::InvalidRotationRange {
                min: range.start,
                max: range.end,
            });
        }

        Ok(Self {
            options,
            state: WheelState::default(),
            rotation: 0.0,
            range,
            duration_ms,
            rng,
        })
    }

    /// Start a spin with a random delta from the configured range.
    ///
    /// Returns `None` without touching any state while a spin is outstanding.
    pub fn spin(&mut self) -> Option<Spin> {
        if self.state.spinning {
            return None;
        }
        let delta = self.rng.random_range(self.range.clone());
        self.spin_by(delta)
    }
}

impl<R> Selector<R> {
    /// Start a spin with a caller-chosen delta (replays, tests).
    ///
    /// Same re-entrancy rule as `spin()`. Deltas that are not finite and
    /// positive are rejected, so targets only ever move forward.
    pub fn spin_by(&mut self, delta: f64) -> Option<Spin> {
        if self.state.spinning {
            return None;
        }
        if !delta.is_finite() || delta <= 0.0 {
            log::warn!("Rejected spin delta {}", delta);
            return None;
        }
        self.state.spinning = true;

        let target = self.rotation + delta;
        self.rotation = target;
        // Stored before the animation ends so the next delta composes on it
        self.state.current_angle = normalize_degrees(target);

        log::debug!(
            "Spin accepted: delta {:.1}°, target {:.1}°, resting {:.1}°",
            delta,
            target,
            self.state.current_angle
        );

        Some(Spin {
            delta,
            target,
            duration_ms: self.duration_ms,
        })
    }

    /// Finish the outstanding spin and return the option under the pointer.
    ///
    /// `None` when no spin is outstanding.
    pub fn resolve(&mut self) -> Option<WheelOption> {
        if !self.state.spinning {
            return None;
        }
        self.state.spinning = false;
        Some(self.options[self.landed_index()].clone())
    }

    /// Index of the option currently under the pointer
    pub fn landed_index(&self) -> usize {
        sector_index(self.state.current_angle, self.options.len())
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.spinning
    }

    /// Absolute rotation the display surface should currently show
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn options(&self) -> &[WheelOption] {
        &self.options
    }

    pub fn sector_angle(&self) -> f64 {
        sector_angle(self.options.len())
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}
