//! Marker overlay controller
//!
//! Owns the primary and secondary markers, decides which one a drag grabs and
//! produces the draw commands for the current positions. All methods run on
//! the session thread.

use crate::config::JawFrameConfig;
use crate::domain::{
    ActiveMarker, DragState, MarkerColor, MarkerPoint, MarkerRole, Point, SurfaceSize,
};
use crate::render::geometry::marker;
use crate::render::DrawCommand;

/// Colors used by the overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPalette {
    pub primary: MarkerColor,
    pub secondary: MarkerColor,
    pub guide: MarkerColor,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            primary: MarkerColor::RED,
            secondary: MarkerColor::BLUE,
            guide: MarkerColor::GREEN,
        }
    }
}

impl From<&JawFrameConfig> for MarkerPalette {
    fn from(config: &JawFrameConfig) -> Self {
        Self {
            primary: config.primary_color,
            secondary: config.secondary_color,
            guide: config.guide_color,
        }
    }
}

/// Default marker positions for a surface
///
/// Primary sits at (10%, 20%) and secondary at (50%, 80%) of the surface.
pub fn initialize(size: SurfaceSize, palette: &MarkerPalette) -> (MarkerPoint, MarkerPoint) {
    let primary = MarkerPoint::new(
        MarkerRole::Primary,
        Point::new(size.width / 10.0, size.height / 5.0),
        palette.primary,
    );
    let secondary = MarkerPoint::new(
        MarkerRole::Secondary,
        Point::new(size.width / 2.0, size.height * 4.0 / 5.0),
        palette.secondary,
    );
    (primary, secondary)
}

/// Two draggable markers joined by a guide line
#[derive(Clone, Debug)]
pub struct MarkerOverlay {
    primary: MarkerPoint,
    secondary: MarkerPoint,
    guide_color: MarkerColor,
    drag: DragState,
}

impl MarkerOverlay {
    /// Create the overlay with default positions for the given surface
    pub fn new(size: SurfaceSize, palette: MarkerPalette) -> Self {
        let (primary, secondary) = initialize(size, &palette);
        Self {
            primary,
            secondary,
            guide_color: palette.guide,
            drag: DragState::default(),
        }
    }

    pub fn primary(&self) -> &MarkerPoint {
        &self.primary
    }

    pub fn secondary(&self) -> &MarkerPoint {
        &self.secondary
    }

    /// Marker currently being dragged, if any
    pub fn active(&self) -> Option<ActiveMarker> {
        self.drag.active
    }

    /// Pick the marker a drag starting at `position` grabs
    ///
    /// Primary is checked first, so it wins when both are in reach.
    pub fn on_drag_start(&mut self, position: Point) -> Option<ActiveMarker> {
        let hit = [&self.primary, &self.secondary]
            .into_iter()
            .find(|m| position.distance(m.position) < marker::HIT_RADIUS)
            .map(|m| m.role);

        match hit {
            Some(role) => {
                log::debug!("Drag grabbed {} marker at {:?}", role.label(), position);
                self.drag.begin(role);
            }
            None => self.drag.clear(),
        }
        hit
    }

    /// Move the active marker by `delta`; positions are not clamped
    pub fn on_drag_move(&mut self, delta: Point) {
        let Some(role) = self.drag.active else {
            return;
        };
        self.marker_mut(role).position += delta;
    }

    pub fn on_drag_end(&mut self) {
        if self.drag.is_dragging() {
            log::debug!("Drag released");
        }
        self.drag.clear();
    }

    /// Draw commands for the current positions: two circles, then the guide line
    pub fn render(&self) -> Vec<DrawCommand> {
        vec![
            DrawCommand::Circle {
                center: self.primary.position,
                radius: marker::RADIUS,
                color: self.primary.color,
            },
            DrawCommand::Circle {
                center: self.secondary.position,
                radius: marker::RADIUS,
                color: self.secondary.color,
            },
            DrawCommand::Line {
                start: self.primary.position,
                end: self.secondary.position,
                width: marker::GUIDE_WIDTH,
                color: self.guide_color,
            },
        ]
    }

    fn marker_mut(&mut self, role: MarkerRole) -> &mut MarkerPoint {
        match role {
            MarkerRole::Primary => &mut self.primary,
            MarkerRole::Secondary => &mut self.secondary,
        }
    }
}
