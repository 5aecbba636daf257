//! Shared geometry constants for the marker overlay
//!
//! Hit testing in the overlay and drawing in the rasterizer both read these,
//! so a marker or the button is grabbed where it is painted.

/// Marker geometry constants
pub mod marker {
    /// Filled circle radius in surface pixels
    pub const RADIUS: f32 = 20.0;
    /// A drag grabs a marker when it starts strictly closer than this
    pub const HIT_RADIUS: f32 = 50.0;
    /// Stroke width of the guide line between the markers
    pub const GUIDE_WIDTH: f32 = 5.0;
}

/// Capture button geometry, anchored to the bottom-right corner
pub mod button {
    pub const WIDTH: f32 = 220.0;
    pub const HEIGHT: f32 = 48.0;
    /// Gap between the button and the surface edges
    pub const MARGIN: f32 = 16.0;
    /// Gap between the label's right edge and the button's right edge
    pub const LABEL_INSET: f32 = 20.0;
}

/// Canvas fill used for the message screen
pub mod background {
    pub const RGBA: [u8; 4] = [0, 0, 0, 255];
}
