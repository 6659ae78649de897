//! Nails on a circle (or an ellipse, when distorted).
//!
//! ## Rust Lesson #24: Memoization with PartialEq
//!
//! Computing every nail position is the expensive part of a circle, so the
//! points are cached. Instead of hashing or tracking dirty flags by hand, the
//! whole config derives `PartialEq`: `set_config` compares old and new, and
//! only a real change recomputes the cache and bumps `generation()`.

use crate::geometry::{BoundingRect, Dimensions, PI2, Point};
use crate::nails::NailKey;

use super::{Easing, Shape, ShapeError, UniqueKeyFn, key_for};

/// Width/height ratio produced by a distortion in `(-1, 1)`.
///
/// Negative distortion narrows the circle (`-0.5` gives `0.5`), positive
/// distortion flattens it (`0.5` gives `2`).
pub fn distortion_to_aspect_ratio(distortion: f64) -> f64 {
    if distortion < 0.0 {
        1.0 + distortion
    } else {
        1.0 / (1.0 - distortion)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleConfig {
    pub n: usize,
    pub size: Dimensions,
    pub margin: f64,
    /// Defaults to half the shorter side, minus the margin.
    pub radius: Option<f64>,
    /// Defaults to the middle of `size`.
    pub center: Option<Point>,
    /// Fraction of a full turn.
    pub rotation: f64,
    pub reverse: bool,
    pub distortion: f64,
    pub displacement: Easing,
    /// Start and end of the arc, as fractions of a full turn. Nails are
    /// spaced `arc / n` apart, so no nail lands on `angle_end` itself.
    pub angle_start: f64,
    pub angle_end: f64,
}

impl CircleConfig {
    pub fn new(n: usize, size: Dimensions) -> Self {
        Self {
            n,
            size,
            margin: 0.0,
            radius: None,
            center: None,
            rotation: 0.0,
            reverse: false,
            distortion: 0.0,
            displacement: Easing::Linear,
            angle_start: 0.0,
            angle_end: 1.0,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_distortion(mut self, distortion: f64) -> Self {
        self.distortion = distortion;
        self
    }

    pub fn with_displacement(mut self, displacement: Easing) -> Self {
        self.displacement = displacement;
        self
    }

    pub fn with_arc(mut self, angle_start: f64, angle_end: f64) -> Self {
        self.angle_start = angle_start;
        self.angle_end = angle_end;
        self
    }

    fn validate(&self) -> Result<(), ShapeError> {
        if self.n < 1 {
            return Err(ShapeError::TooFewNails { shape: "circle", min: 1, got: self.n });
        }
        if !(self.distortion > -1.0 && self.distortion < 1.0) {
            return Err(ShapeError::Distortion(self.distortion));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Circle {
    config: CircleConfig,
    center: Point,
    radius: f64,
    x_radius: f64,
    y_radius: f64,
    points: Vec<Point>,
    generation: u64,
    unique_key: Option<UniqueKeyFn>,
}

impl std::fmt::Debug for Circle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circle")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Circle {
    pub fn new(config: CircleConfig) -> Result<Self, ShapeError> {
        let mut circle = Self {
            config: config.clone(),
            center: Point::default(),
            radius: 0.0,
            x_radius: 0.0,
            y_radius: 0.0,
            points: Vec::new(),
            generation: 0,
            unique_key: None,
        };
        circle.apply(config)?;
        Ok(circle)
    }

    /// Route nail keys through `hook` instead of plain indices.
    pub fn with_unique_key(mut self, hook: UniqueKeyFn) -> Self {
        self.unique_key = Some(hook);
        self
    }

    pub fn config(&self) -> &CircleConfig {
        &self.config
    }

    /// Bumped every time the cached points are recomputed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Update the config. Returns whether anything changed; an equal config
    /// keeps the cache (and the generation) as is.
    pub fn set_config(&mut self, config: CircleConfig) -> Result<bool, ShapeError> {
        if config == self.config {
            return Ok(false);
        }
        self.apply(config)?;
        self.generation += 1;
        Ok(true)
    }

    fn apply(&mut self, config: CircleConfig) -> Result<(), ShapeError> {
        config.validate()?;
        let center = config.center.unwrap_or_else(|| config.size.center());
        let radius = config
            .radius
            .unwrap_or_else(|| config.size.min_side() / 2.0 - config.margin);
        if radius <= 0.0 {
            return Err(ShapeError::EmptySize { shape: "circle" });
        }

        let aspect_ratio = distortion_to_aspect_ratio(config.distortion);
        let (x_radius, y_radius) = if aspect_ratio < 1.0 {
            (radius * aspect_ratio, radius)
        } else {
            (radius, radius / aspect_ratio)
        };

        let arc = (config.angle_end - config.angle_start) * PI2;
        let divisor = config.n as f64;
        let start = (config.rotation + config.angle_start) * PI2;

        self.points = (0..config.n)
            .map(|i| {
                let t = config.displacement.apply(i as f64 / divisor);
                let angle = start + t * arc;
                Point::new(center.x + x_radius * angle.sin(), center.y + y_radius * angle.cos())
            })
            .collect();
        self.center = center;
        self.radius = radius;
        self.x_radius = x_radius;
        self.y_radius = y_radius;
        self.config = config;
        Ok(())
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Wrap any index onto the circle, honoring `reverse`.
    fn normalize(&self, index: usize) -> usize {
        let n = self.config.n;
        let index = index % n;
        if self.config.reverse { (n - index) % n } else { index }
    }
}

impl Shape for Circle {
    fn nail_count(&self) -> usize {
        self.config.n
    }

    fn get_point(&self, index: usize) -> Point {
        self.points[self.normalize(index)]
    }

    fn get_key(&self, index: usize) -> NailKey {
        key_for(self.unique_key.as_ref(), self.normalize(index))
    }

    fn get_bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_edges(
            self.center.y - self.y_radius,
            self.center.x + self.x_radius,
            self.center.y + self.y_radius,
            self.center.x - self.x_radius,
        )
    }

    fn get_aspect_ratio(&self) -> f64 {
        distortion_to_aspect_ratio(self.config.distortion)
    }
}

// ============================================================================
// TESTS
// ============================================================================
