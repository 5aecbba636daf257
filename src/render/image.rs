//! Image rendering for the marker overlay using tiny-skia
//!
//! These functions draw overlay commands onto RgbaImage frames before they are
//! handed to the preview window.

use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::DrawCommand;
use super::geometry::background;
use crate::domain::MarkerColor;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

fn solid_paint(color: MarkerColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Draw overlay commands onto an image in order
pub fn draw_commands_on_image(img: &mut RgbaImage, commands: &[DrawCommand]) {
    if commands.is_empty() {
        return;
    }

    with_pixmap(img, |pixmap| {
        for command in commands {
            match *command {
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
                        continue;
                    };
                    pixmap.fill_path(
                        &path,
                        &solid_paint(color),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
                DrawCommand::Line {
                    start,
                    end,
                    width,
                    color,
                } => {
                    let mut pb = PathBuilder::new();
                    pb.move_to(start.x, start.y);
                    pb.line_to(end.x, end.y);
                    let Some(path) = pb.finish() else {
                        continue;
                    };
                    let stroke = Stroke {
                        width,
                        line_cap: LineCap::Butt,
                        ..Default::default()
                    };
                    pixmap.stroke_path(
                        &path,
                        &solid_paint(color),
                        &stroke,
                        Transform::identity(),
                        None,
                    );
                }
                DrawCommand::Rect { bounds, color } => {
                    if let Some(rect) = tiny_skia::Rect::from_ltrb(
                        bounds.left,
                        bounds.top,
                        bounds.right,
                        bounds.bottom,
                    ) {
                        pixmap.fill_rect(rect, &solid_paint(color), Transform::identity(), None);
                    }
                }
            }
        }
    });
}

/// Copy of `frame` with the overlay drawn on top
pub fn composite(frame: &RgbaImage, commands: &[DrawCommand]) -> RgbaImage {
    let mut out = frame.clone();
    draw_commands_on_image(&mut out, commands);
    out
}

/// Opaque background frame for screens without camera input
pub fn blank_frame(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(background::RGBA))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SurfaceSize;
    use crate::overlay::{MarkerOverlay, MarkerPalette};

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn rendered_default_overlay() -> RgbaImage {
        let overlay = MarkerOverlay::new(SurfaceSize::new(640.0, 480.0), MarkerPalette::default());
        composite(&blank_frame(640, 480), &overlay.render())
    }

    #[test]
    fn test_markers_painted_in_their_colors() {
        let img = rendered_default_overlay();
        // Inside each circle, off the guide line
        assert_eq!(img.get_pixel(73, 88).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(311, 392).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_guide_line_painted_between_markers() {
        let img = rendered_default_overlay();
        // Midpoint of (64, 96) -> (320, 384)
        assert_eq!(img.get_pixel(192, 240).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_rest_of_frame_untouched() {
        let img = rendered_default_overlay();
        assert_eq!(img.get_pixel(600, 20).0, BLACK);
        assert_eq!(img.get_pixel(10, 470).0, BLACK);
    }

    #[test]
    fn test_offscreen_markers_do_not_panic() {
        let mut overlay = MarkerOverlay::new(SurfaceSize::new(64.0, 48.0), MarkerPalette::default());
        overlay.on_drag_start(crate::domain::Point::new(6.4, 9.6));
        overlay.on_drag_move(crate::domain::Point::new(-500.0, -500.0));

        let img = composite(&blank_frame(64, 48), &overlay.render());
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn test_rect_filled_inside_bounds_only() {
        let bounds = crate::domain::Rect::new(2.0, 2.0, 6.0, 5.0);
        let img = composite(
            &blank_frame(8, 8),
            &[DrawCommand::Rect {
                bounds,
                color: MarkerColor::GREEN,
            }],
        );
        assert_eq!(img.get_pixel(2, 2).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(5, 4).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(6, 4).0, BLACK);
        assert_eq!(img.get_pixel(3, 5).0, BLACK);
    }

    #[test]
    fn test_empty_commands_leave_frame_unchanged() {
        let frame = blank_frame(8, 8);
        assert_eq!(composite(&frame, &[]), frame);
    }
}
