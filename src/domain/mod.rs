//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here should have no framework dependencies (gstreamer, zbus, etc.)
//! so the overlay and session logic can be tested in isolation.

pub mod capture;
pub mod color;
pub mod geometry;
pub mod marker;

pub use capture::*;
pub use color::*;
pub use geometry::*;
pub use marker::*;
