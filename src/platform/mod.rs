//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, one file per key natively)
//! - Display surface (DOM on web, terminal natively)

pub mod display;
pub mod storage;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use display::{ButtonState, DisplaySurface};
pub use storage::{MemoryStorage, Storage};
