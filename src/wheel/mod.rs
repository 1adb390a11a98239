//! Wheel model
//!
//! Pure decision logic only: no DOM, no timers, no storage.
//! - `option`: The fixed, ordered option set
//! - `sector`: Angle <-> sector geometry under a top-mounted pointer
//! - `selector`: Two-phase spin (draw target) / resolve (read pointer)

pub mod option;
pub mod sector;
pub mod selector;

pub use option::{WheelOption, reference_options};
pub use sector::{conic_gradient, label_position, sector_angle, sector_center_deg, sector_index};
pub use selector::{Selector, Spin, WheelState};
