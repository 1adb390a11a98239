//! Wheel options

use serde::{Deserialize, Serialize};

/// One labeled slice of the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelOption {
    /// Text shown on the wheel and recorded in history
    pub value: String,
    /// CSS color of the sector
    pub color: String,
}

impl WheelOption {
    pub fn new(value: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: color.into(),
        }
    }
}

/// Light/dark sector swatches, alternating around the wheel
const SWATCHES: [&str; 2] = ["#ffeaa7", "#fdcb6e"];

/// The eight-name wheel the page ships with
pub fn reference_options() -> Vec<WheelOption> {
    ["三三", "小璐", "小马", "小刘", "云墨", "刘总", "芋圆", "花子"]
        .iter()
        .enumerate()
        .map(|(i, name)| WheelOption::new(*name, SWATCHES[i % SWATCHES.len()]))
        .collect()
}
