//! Geometric types for marker positions and drag offsets

use std::ops::{Add, AddAssign, Sub};

/// A position or offset in surface-pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point from coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Dimensions of the surface the overlay is drawn on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle in surface-pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Check if this rectangle contains a point (right and bottom edges excluded)
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(100.0, 400.0);
        let b = Point::new(103.0, 404.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let mut p = Point::new(1.0, 2.0);
        p += Point::new(0.5, -4.0);
        assert_eq!(p, Point::new(1.5, -2.0));
        assert_eq!(p - Point::new(1.5, -2.0), Point::default());
        assert_eq!(p + Point::new(1.0, 1.0), Point::new(2.5, -1.0));
    }

    #[test]
    fn test_empty_surface() {
        assert!(SurfaceSize::new(0.0, 480.0).is_empty());
        assert!(!SurfaceSize::new(640.0, 480.0).is_empty());
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::new(10.0, 20.0, 30.0, 60.0);
        assert_eq!(rect.width(), 20.0);
        assert_eq!(rect.height(), 40.0);
        assert!(rect.contains_point(Point::new(10.0, 20.0)));
        assert!(rect.contains_point(Point::new(29.9, 59.9)));
        assert!(!rect.contains_point(Point::new(30.0, 40.0)));
        assert!(!rect.contains_point(Point::new(15.0, 19.0)));
    }
}
