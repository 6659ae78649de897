//! Core geometry types for string-art.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! In JS you'd write: `const point = { x: 1.0, y: 2.0 }`
//! In Rust, we define a `struct` with explicit types.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` = can duplicate the value (like spread: `{...obj}`)
//! - `Copy` = can copy implicitly (small stack values only)
//! - `PartialEq` = can compare with `==`

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A full turn in radians.
pub const PI2: f64 = PI * 2.0;

/// A 2D point with x,y coordinates in canvas units.
///
/// Y grows downward, the way canvas and SVG coordinates do.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Nail coordinates are plain points.
pub type Coordinates = Point;

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle.
///
/// Invariant: `width == right - left` and `height == bottom - top`, both >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================

impl Point {
    /// Create a new point. This is a common pattern instead of constructors.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`. `t = 0` is self, `t = 1` is other.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Rotate around `center` by `angle` radians.
    #[inline]
    pub fn rotate_around(&self, center: Point, angle: f64) -> Point {
        if angle == 0.0 {
            return *self;
        }
        let (sin_a, cos_a) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            center.x + dx * cos_a - dy * sin_a,
            center.y + dx * sin_a + dy * cos_a,
        )
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl Dimensions {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square canvas.
    #[inline]
    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// Center point of the canvas.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The shorter side.
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Largest size with the given aspect ratio that fits inside self.
    pub fn fit_aspect_ratio(&self, aspect_ratio: f64) -> Dimensions {
        if self.aspect_ratio() > aspect_ratio {
            Dimensions::new(self.height * aspect_ratio, self.height)
        } else {
            Dimensions::new(self.width, self.width / aspect_ratio)
        }
    }
}

impl BoundingRect {
    /// Build a rect from its edges, normalizing swapped edges.
    pub fn from_edges(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let (top, bottom) = if top <= bottom { (top, bottom) } else { (bottom, top) };
        Self {
            top,
            right,
            bottom,
            left,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Bounding rect of a point set, or None when the set is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_edges(min_y, max_x, max_y, min_x))
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &BoundingRect) -> BoundingRect {
        Self::from_edges(
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
            self.left.min(other.left),
        )
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Width divided by height. A degenerate (zero height) rect reports 1.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(distance(p1, p2), 5.0); // 3-4-5 triangle
        assert_eq!(distance(p2, p1), 5.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 15.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = Point::new(10.0, 0.0).rotate_around(Point::new(0.0, 0.0), PI / 2.0);
        assert!((p.x - 0.0).abs() < 1e-10);
        assert!((p.y - 10.0).abs() < 1e-10);
    }

    #[test]
    fn bounding_rect_of_points() {
        let rect = BoundingRect::from_points([
            Point::new(10.0, 5.0),
            Point::new(-2.0, 7.0),
            Point::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(rect.left, -2.0);
        assert_eq!(rect.right, 10.0);
        assert_eq!(rect.top, -1.0);
        assert_eq!(rect.bottom, 7.0);
        assert_eq!(rect.width, 12.0);
        assert_eq!(rect.height, 8.0);
    }

    #[test]
    fn empty_bounding_rect() {
        assert_eq!(BoundingRect::from_points(Vec::<Point>::new()), None);
    }

    #[test]
    fn swapped_edges_stay_non_negative() {
        let rect = BoundingRect::from_edges(10.0, 0.0, 0.0, 5.0);
        assert_eq!(rect.width, 5.0);
        assert_eq!(rect.height, 10.0);
    }

    #[test]
    fn fit_aspect_ratio_inside_canvas() {
        let canvas = Dimensions::new(200.0, 100.0);
        assert_eq!(canvas.fit_aspect_ratio(1.0), Dimensions::new(100.0, 100.0));
        assert_eq!(canvas.fit_aspect_ratio(4.0), Dimensions::new(200.0, 50.0));
    }

    #[test]
    fn round_to_six_places() {
        assert_eq!(round_to(0.123_456_789, 6), 0.123457);
        assert_eq!(round_to(88.0, 6), 88.0);
    }
}
