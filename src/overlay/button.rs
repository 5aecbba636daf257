//! On-screen capture button
//!
//! A filled rectangle in the bottom-right corner of the preview. The label is
//! drawn by the display surface on top of it.

use crate::domain::{MarkerColor, Point, Rect, SurfaceSize};
use crate::render::DrawCommand;
use crate::render::geometry::button;

/// Text shown on the capture button
pub const CAPTURE_BUTTON_LABEL: &str = "Take Image [Space]";

const FILL: MarkerColor = MarkerColor::rgb(0.2, 0.2, 0.2);

/// Clickable area that requests a capture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureButton {
    bounds: Rect,
}

impl CaptureButton {
    /// Place the button for the given surface
    ///
    /// On surfaces smaller than the button it is cut to the visible part.
    pub fn new(size: SurfaceSize) -> Self {
        let left = (size.width - button::MARGIN - button::WIDTH).max(0.0);
        let top = (size.height - button::MARGIN - button::HEIGHT).max(0.0);
        let right = (left + button::WIDTH).min(size.width);
        let bottom = (top + button::HEIGHT).min(size.height);
        Self {
            bounds: Rect::new(left, top, right, bottom),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn contains(&self, position: Point) -> bool {
        self.bounds.contains_point(position)
    }

    pub fn render(&self) -> DrawCommand {
        DrawCommand::Rect {
            bounds: self.bounds,
            color: FILL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_anchored_bottom_right() {
        let button = CaptureButton::new(SurfaceSize::new(640.0, 480.0));
        assert_eq!(button.bounds(), Rect::new(404.0, 416.0, 624.0, 464.0));
        assert!(button.contains(Point::new(500.0, 440.0)));
        assert!(!button.contains(Point::new(64.0, 96.0)));
    }

    #[test]
    fn test_button_cut_to_small_surface() {
        let button = CaptureButton::new(SurfaceSize::new(100.0, 40.0));
        assert_eq!(button.bounds(), Rect::new(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn test_button_renders_as_rect() {
        let button = CaptureButton::new(SurfaceSize::new(640.0, 480.0));
        assert!(matches!(
            button.render(),
            DrawCommand::Rect { bounds, .. } if bounds == button.bounds()
        ));
    }
}
