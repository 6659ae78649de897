//! Evenly spaced nails on a straight segment.

use crate::geometry::{BoundingRect, PI2, Point};
use crate::nails::{NailKey, NailsSetter};

use super::{Shape, ShapeError, UniqueKeyFn, key_for};

/// The point a line rotates around.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Pivot {
    #[default]
    Center,
    From,
    To,
    Point(Point),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineConfig {
    pub from: Point,
    pub to: Point,
    pub n: usize,
    /// Fraction of a full turn.
    pub rotation: f64,
    pub pivot: Pivot,
    /// First index registered as a nail.
    pub draw_start_index: Option<usize>,
    /// Last index registered as a nail (inclusive).
    pub draw_end_index: Option<usize>,
}

impl LineConfig {
    pub fn new(from: Point, to: Point, n: usize) -> Self {
        Self {
            from,
            to,
            n,
            rotation: 0.0,
            pivot: Pivot::Center,
            draw_start_index: None,
            draw_end_index: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f64, pivot: Pivot) -> Self {
        self.rotation = rotation;
        self.pivot = pivot;
        self
    }

    pub fn with_draw_window(mut self, start: usize, end: usize) -> Self {
        self.draw_start_index = Some(start);
        self.draw_end_index = Some(end);
        self
    }
}

#[derive(Clone)]
pub struct Line {
    config: LineConfig,
    from: Point,
    to: Point,
    unique_key: Option<UniqueKeyFn>,
}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Line").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Line {
    pub fn new(config: LineConfig) -> Result<Self, ShapeError> {
        if config.n < 1 {
            return Err(ShapeError::TooFewNails { shape: "line", min: 1, got: config.n });
        }
        let pivot = match config.pivot {
            Pivot::Center => config.from.lerp(config.to, 0.5),
            Pivot::From => config.from,
            Pivot::To => config.to,
            Pivot::Point(point) => point,
        };
        let angle = config.rotation * PI2;
        let from = config.from.rotate_around(pivot, angle);
        let to = config.to.rotate_around(pivot, angle);
        Ok(Self { config, from, to, unique_key: None })
    }

    pub fn with_unique_key(mut self, hook: UniqueKeyFn) -> Self {
        self.unique_key = Some(hook);
        self
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    /// Indices inside the draw window.
    pub fn drawn_indices(&self) -> std::ops::RangeInclusive<usize> {
        let last = self.config.n - 1;
        let start = self.config.draw_start_index.unwrap_or(0).min(last);
        let end = self.config.draw_end_index.unwrap_or(last).min(last);
        start..=end
    }
}

impl Shape for Line {
    fn nail_count(&self) -> usize {
        self.drawn_indices().count()
    }

    fn get_point(&self, index: usize) -> Point {
        if self.config.n == 1 {
            return self.from;
        }
        let t = index as f64 / (self.config.n - 1) as f64;
        self.from.lerp(self.to, t)
    }

    fn get_key(&self, index: usize) -> NailKey {
        key_for(self.unique_key.as_ref(), index)
    }

    fn draw_nails(&self, nails: &mut dyn NailsSetter) {
        for index in self.drawn_indices() {
            nails.add_nail(self.get_key(index), self.get_point(index));
        }
    }

    fn get_bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_points([self.from, self.to])
            .unwrap_or_else(|| BoundingRect::from_edges(self.from.y, self.from.x, self.from.y, self.from.x))
    }
}
