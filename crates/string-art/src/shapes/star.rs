//! A star of straight arms with a "merry-go-round" threading.
//!
//! Arm `a` carries `side_nails` nails from `center_radius` out to `radius`.
//! Each round of the threading walks once around the star, alternating
//! between a nail near the center and its mirror near the tip, so every pair
//! of neighboring arms accumulates a curve.

use crate::geometry::{BoundingRect, PI2, Point};
use crate::nails::NailKey;
use crate::steps::Step;

use super::{Shape, ShapeError, UniqueKeyFn, key_for};

#[derive(Debug, Clone, PartialEq)]
pub struct StarShapeConfig {
    pub sides: usize,
    pub side_nails: usize,
    pub center: Point,
    pub radius: f64,
    /// Distance of the innermost nail from the center.
    pub center_radius: f64,
    /// Fraction of a full turn.
    pub rotation: f64,
    /// Rounds of threading; defaults to `side_nails`.
    pub max_curve_size: Option<usize>,
}

impl StarShapeConfig {
    pub fn new(sides: usize, side_nails: usize, center: Point, radius: f64) -> Self {
        Self {
            sides,
            side_nails,
            center,
            radius,
            center_radius: 0.0,
            rotation: 0.0,
            max_curve_size: None,
        }
    }

    pub fn with_center_radius(mut self, center_radius: f64) -> Self {
        self.center_radius = center_radius;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_max_curve_size(mut self, max_curve_size: usize) -> Self {
        self.max_curve_size = Some(max_curve_size);
        self
    }
}

#[derive(Clone)]
pub struct StarShape {
    config: StarShapeConfig,
    unique_key: Option<UniqueKeyFn>,
}

impl std::fmt::Debug for StarShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarShape").field("config", &self.config).finish_non_exhaustive()
    }
}

impl StarShape {
    pub fn new(config: StarShapeConfig) -> Result<Self, ShapeError> {
        if config.sides < 2 {
            return Err(ShapeError::TooFewSides { shape: "star", min: 2, got: config.sides });
        }
        if config.side_nails < 1 {
            return Err(ShapeError::TooFewNails { shape: "star", min: 1, got: config.side_nails });
        }
        if config.radius <= 0.0 {
            return Err(ShapeError::EmptySize { shape: "star" });
        }
        Ok(Self { config, unique_key: None })
    }

    pub fn with_unique_key(mut self, hook: UniqueKeyFn) -> Self {
        self.unique_key = Some(hook);
        self
    }

    pub fn config(&self) -> &StarShapeConfig {
        &self.config
    }

    /// Rounds of threading, clamped to `1..=side_nails`.
    pub fn max_curve_size(&self) -> usize {
        self.config
            .max_curve_size
            .unwrap_or(self.config.side_nails)
            .clamp(1, self.config.side_nails)
    }

    /// Point of nail `nail` (1-based, counted from the center) on arm `arm`.
    pub fn get_arm_point(&self, arm: usize, nail: usize) -> Point {
        let c = &self.config;
        let distance = if c.side_nails == 1 {
            c.radius
        } else {
            c.center_radius + (c.radius - c.center_radius) * (nail - 1) as f64 / (c.side_nails - 1) as f64
        };
        let angle = c.rotation * PI2 + (arm % c.sides) as f64 * PI2 / c.sides as f64;
        Point::new(c.center.x + distance * angle.sin(), c.center.y - distance * angle.cos())
    }

    pub fn arm_key(&self, arm: usize, nail: usize) -> NailKey {
        self.get_key((arm % self.config.sides) * self.config.side_nails + nail - 1)
    }

    /// Strings pulled by [`StarShape::threading`].
    pub fn step_count(&self) -> usize {
        self.config.sides * self.max_curve_size()
    }

    /// The merry-go-round threading, one step per string.
    pub fn threading(&self) -> StarThreading {
        StarThreading {
            star: self.clone(),
            round: 1,
            arm: 1,
        }
    }
}

impl Shape for StarShape {
    fn nail_count(&self) -> usize {
        self.config.sides * self.config.side_nails
    }

    fn get_point(&self, index: usize) -> Point {
        let n = self.config.side_nails;
        self.get_arm_point(index / n, index % n + 1)
    }

    fn get_key(&self, index: usize) -> NailKey {
        key_for(self.unique_key.as_ref(), index)
    }

    fn get_bounding_rect(&self) -> BoundingRect {
        let tips = (0..self.config.sides).flat_map(|arm| {
            [self.get_arm_point(arm, 1), self.get_arm_point(arm, self.config.side_nails)]
        });
        BoundingRect::from_points(tips)
            .unwrap_or_else(|| BoundingRect::from_edges(0.0, 0.0, 0.0, 0.0))
    }
}

/// Iterator over a star's threading steps.
#[derive(Debug, Clone)]
pub struct StarThreading {
    star: StarShape,
    round: usize,
    arm: usize,
}

impl Iterator for StarThreading {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let rounds = self.star.max_curve_size();
        if self.round > rounds {
            return None;
        }
        let (round, arm) = (self.round, self.arm);
        let nail = if arm % 2 == 1 { rounds + 1 - round } else { round };
        let to = self.star.arm_key(arm, nail);

        let step = if arm == 1 {
            Step::line(self.star.arm_key(0, round), to)
        } else {
            Step::to(to)
        };

        if arm == self.star.config.sides {
            self.round += 1;
            self.arm = 1;
        } else {
            self.arm += 1;
        }
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rounds = self.star.max_curve_size();
        let sides = self.star.config.sides;
        let remaining = if self.round > rounds {
            0
        } else {
            (rounds - self.round) * sides + (sides - self.arm + 1)
        };
        (remaining, Some(remaining))
    }
}
