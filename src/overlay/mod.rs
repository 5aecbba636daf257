//! Marker overlay module
//!
//! This module contains:
//! - The marker overlay controller (two draggable points and their guide line)
//! - The gesture tracker that turns raw pointer input into drag operations
//! - The on-screen capture button

pub mod button;
pub mod controller;
pub mod gesture;

pub use button::{CAPTURE_BUTTON_LABEL, CaptureButton};
pub use controller::{MarkerOverlay, MarkerPalette, initialize};
pub use gesture::{GestureTracker, PointerEvent};
