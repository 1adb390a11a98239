//! Sector geometry
//!
//! The pointer sits at the top of the wheel and the wheel turns clockwise
//! for positive angles. Sector `i` covers the clockwise span
//! `[i * w, (i + 1) * w)` from the top of the unrotated wheel, `w = 360 / n`.
//! After a clockwise rotation by `a`, the wheel point under the pointer is
//! the one that started at `360 - a`.

use glam::Vec2;

use super::option::WheelOption;
use crate::consts::FULL_TURN;
use crate::normalize_degrees;

/// Angular width of one sector in degrees
#[inline]
pub fn sector_angle(n: usize) -> f64 {
    FULL_TURN / n as f64
}

/// Index of the sector under the pointer after rotating by `angle` degrees.
///
/// Always in `[0, n - 1]`; float drift at the last boundary clamps down.
/// Returns 0 for an empty wheel.
pub fn sector_index(angle: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let under_pointer = normalize_degrees(FULL_TURN - normalize_degrees(angle));
    let index = (under_pointer / sector_angle(n)).floor();
    if index.is_nan() || index < 0.0 {
        0
    } else {
        (index as usize).min(n - 1)
    }
}

/// Clockwise angle from the top to the middle of sector `index`
#[inline]
pub fn sector_center_deg(index: usize, n: usize) -> f64 {
    (index as f64 + 0.5) * sector_angle(n)
}

/// Label anchor for sector `index` relative to the wheel center.
///
/// Screen coordinates (y grows downward), unrotated wheel.
pub fn label_position(index: usize, n: usize, radius: f32) -> Vec2 {
    let theta = sector_center_deg(index, n).to_radians() as f32;
    Vec2::new(radius * theta.sin(), -radius * theta.cos())
}

/// CSS background painting each option's color over its sector
pub fn conic_gradient(options: &[WheelOption]) -> String {
    let width = sector_angle(options.len());
    let stops: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let start = i as f64 * width;
            let end = start + width;
            format!("{} {}deg {}deg", option.color, trim(start), trim(end))
        })
        .collect();
    format!("conic-gradient(from 0deg, {})", stops.join(", "))
}

/// Format degrees without trailing zeros
fn trim(deg: f64) -> String {
    let s = format!("{:.3}", deg);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::reference_options;
    use proptest::prelude::*;

    #[test]
    fn test_sector_index_reference_points() {
        assert_eq!(sector_index(0.0, 8), 0);
        // Rotating by one sector brings the last sector under the pointer
        assert_eq!(sector_index(45.0, 8), 7);
        assert_eq!(sector_index(90.0, 8), 6);
        assert_eq!(sector_index(315.0, 8), 1);
        assert_eq!(sector_index(359.999, 8), 0);
        assert_eq!(sector_index(1125.0, 8), 7);
    }

    #[test]
    fn test_sector_index_every_sector_reachable() {
        let mut seen = [false; 8];
        for tenth in 0..3600 {
            seen[sector_index(tenth as f64 / 10.0, 8)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sector_index_boundary_drift() {
        // Just below a full turn the pointer reads a hair above 0
        assert_eq!(sector_index(360.0 - f64::EPSILON * 256.0, 8), 0);
        assert_eq!(sector_index(-f64::EPSILON, 8), 0);
        assert_eq!(sector_index(0.0, 0), 0);
        assert_eq!(sector_index(123.0, 1), 0);
    }

    #[test]
    fn test_label_position() {
        // Sector 0 center is 22.5° clockwise from the top: right of center, above it
        let p = label_position(0, 8, 100.0);
        assert!(p.x > 0.0 && p.y < 0.0);
        assert!((p.length() - 100.0).abs() < 0.001);

        // Sector 4 center is 202.5°: left of center, below it
        let p = label_position(4, 8, 100.0);
        assert!(p.x < 0.0 && p.y > 0.0);
    }

    #[test]
    fn test_conic_gradient() {
        let css = conic_gradient(&reference_options());
        assert!(css.starts_with("conic-gradient(from 0deg, #ffeaa7 0deg 45deg, #fdcb6e 45deg 90deg"));
        assert!(css.ends_with("#fdcb6e 315deg 360deg)"));
    }

    proptest! {
        #[test]
        fn prop_sector_index_matches_formula(angle in 0.0f64..360.0) {
            let index = sector_index(angle, 8);
            let expected = (((360.0 - angle % 360.0) % 360.0) / 45.0).floor().clamp(0.0, 7.0) as usize;
            prop_assert_eq!(index, expected);
        }

        #[test]
        fn prop_sector_index_in_range(angle in -1.0e6f64..1.0e6, n in 1usize..64) {
            prop_assert!(sector_index(angle, n) < n);
        }
    }
}
