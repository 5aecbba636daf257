//! Colors of the overlay primitives

use serde::{Deserialize, Serialize};

/// RGB color with components in 0.0-1.0, serializable for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MarkerColor {
    pub const RED: MarkerColor = MarkerColor::rgb(1.0, 0.0, 0.0);
    pub const GREEN: MarkerColor = MarkerColor::rgb(0.0, 1.0, 0.0);
    pub const BLUE: MarkerColor = MarkerColor::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_color_to_rgba() {
        assert_eq!(MarkerColor::RED.to_rgba_u8(), [255, 0, 0, 255]);
        assert_eq!(MarkerColor::rgb(0.5, 2.0, -1.0).to_rgba_u8(), [128, 255, 0, 255]);
    }
}
