//! Pointer-to-drag translation
//!
//! The preview window only reports absolute pointer positions. The tracker
//! keeps the previous position so the overlay receives drag deltas.

use crate::domain::{ActiveMarker, Point};

use super::controller::MarkerOverlay;

/// Raw pointer input in surface-pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Motion(Point),
    Release,
}

/// Drag gesture state between a press and a release
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureTracker {
    last: Option<Point>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one pointer event into the overlay
    ///
    /// Returns true when a marker moved and the overlay needs redrawing.
    pub fn handle(&mut self, event: PointerEvent, overlay: &mut MarkerOverlay) -> bool {
        match event {
            PointerEvent::Press(position) => {
                self.press(position, overlay);
                false
            }
            PointerEvent::Motion(position) => self.motion(position, overlay),
            PointerEvent::Release => {
                self.release(overlay);
                false
            }
        }
    }

    pub fn press(&mut self, position: Point, overlay: &mut MarkerOverlay) -> Option<ActiveMarker> {
        self.last = Some(position);
        overlay.on_drag_start(position)
    }

    pub fn motion(&mut self, position: Point, overlay: &mut MarkerOverlay) -> bool {
        let Some(last) = self.last.replace(position) else {
            return false;
        };
        if overlay.active().is_none() {
            return false;
        }
        overlay.on_drag_move(position - last);
        true
    }

    pub fn release(&mut self, overlay: &mut MarkerOverlay) {
        self.last = None;
        overlay.on_drag_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarkerRole, SurfaceSize};
    use crate::overlay::MarkerPalette;

    fn overlay() -> MarkerOverlay {
        MarkerOverlay::new(SurfaceSize::new(1000.0, 2000.0), MarkerPalette::default())
    }

    #[test]
    fn test_motion_is_translated_to_delta() {
        let mut overlay = overlay();
        let mut tracker = GestureTracker::new();

        assert_eq!(
            tracker.press(Point::new(105.0, 405.0), &mut overlay),
            Some(MarkerRole::Primary)
        );
        assert!(tracker.handle(PointerEvent::Motion(Point::new(115.0, 395.0)), &mut overlay));
        assert_eq!(overlay.primary().position, Point::new(110.0, 395.0));

        assert!(tracker.handle(PointerEvent::Motion(Point::new(120.0, 390.0)), &mut overlay));
        assert_eq!(overlay.primary().position, Point::new(115.0, 390.0));
    }

    #[test]
    fn test_motion_without_press_is_ignored() {
        let mut overlay = overlay();
        let mut tracker = GestureTracker::new();

        assert!(!tracker.handle(PointerEvent::Motion(Point::new(100.0, 400.0)), &mut overlay));
        assert!(!tracker.handle(PointerEvent::Motion(Point::new(140.0, 440.0)), &mut overlay));
        assert_eq!(overlay.primary().position, Point::new(100.0, 400.0));
        assert_eq!(tracker.last, None);
    }

    #[test]
    fn test_release_ends_the_drag() {
        let mut overlay = overlay();
        let mut tracker = GestureTracker::new();

        tracker.handle(PointerEvent::Press(Point::new(500.0, 1600.0)), &mut overlay);
        tracker.handle(PointerEvent::Motion(Point::new(510.0, 1600.0)), &mut overlay);
        tracker.handle(PointerEvent::Release, &mut overlay);
        assert_eq!(overlay.active(), None);

        tracker.handle(PointerEvent::Motion(Point::new(600.0, 1700.0)), &mut overlay);
        assert_eq!(overlay.secondary().position, Point::new(510.0, 1600.0));
    }

    #[test]
    fn test_press_away_from_markers_moves_nothing() {
        let mut overlay = overlay();
        let mut tracker = GestureTracker::new();

        tracker.handle(PointerEvent::Press(Point::new(800.0, 100.0)), &mut overlay);
        assert_eq!(tracker.last, Some(Point::new(800.0, 100.0)));
        assert!(!tracker.handle(PointerEvent::Motion(Point::new(100.0, 400.0)), &mut overlay));
        assert_eq!(overlay.primary().position, Point::new(100.0, 400.0));
    }
}
