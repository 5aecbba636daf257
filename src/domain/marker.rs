//! Marker types for the reference points drawn over the preview
//!
//! Marker positions are stored in surface-pixel coordinates.

use super::color::MarkerColor;

use super::geometry::Point;

/// Fixed semantic role of a marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// Checked first when a drag starts
    Primary,
    Secondary,
}

impl MarkerRole {
    /// Short label used in log output
    pub fn label(self) -> &'static str {
        match self {
            MarkerRole::Primary => "primary",
            MarkerRole::Secondary => "secondary",
        }
    }
}

/// Marker grabbed by the current drag gesture
pub type ActiveMarker = MarkerRole;

/// One of the two draggable reference points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPoint {
    pub role: MarkerRole,
    /// Center in surface-pixel coordinates
    pub position: Point,
    pub color: MarkerColor,
}

impl MarkerPoint {
    pub fn new(role: MarkerRole, position: Point, color: MarkerColor) -> Self {
        Self {
            role,
            position,
            color,
        }
    }
}

/// Per-gesture drag state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    pub active: Option<ActiveMarker>,
}

impl DragState {
    pub fn begin(&mut self, marker: ActiveMarker) {
        self.active = Some(marker);
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}
