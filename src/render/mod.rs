//! Overlay rendering module
//!
//! This module contains:
//! - Draw commands produced by the marker overlay
//! - Geometry constants shared by hit testing and drawing
//! - Image rendering using tiny-skia (for compositing preview frames)

pub mod geometry;
pub mod image;

use crate::domain::{MarkerColor, Point, Rect};

/// A single primitive of the marker overlay, in surface-pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled circle
    Circle {
        center: Point,
        radius: f32,
        color: MarkerColor,
    },
    /// Straight stroked line
    Line {
        start: Point,
        end: Point,
        width: f32,
        color: MarkerColor,
    },
    /// Filled axis-aligned rectangle
    Rect { bounds: Rect, color: MarkerColor },
}
