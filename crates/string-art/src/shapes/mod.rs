//! Geometric shapes that place nails.
//!
//! A shape maps a local index to a point. Patterns compose several shapes,
//! so each one takes an optional unique-key hook turning its local index into
//! the global [`NailKey`] it registers under.

mod circle;
mod easing;
mod line;
mod polygon;
mod star;

pub use circle::{Circle, CircleConfig, distortion_to_aspect_ratio};
pub use easing::Easing;
pub use line::{Line, LineConfig, Pivot};
pub use polygon::{Polygon, PolygonConfig};
pub use star::{StarShape, StarShapeConfig};

use std::sync::Arc;

use thiserror::Error;

use crate::geometry::{BoundingRect, Point};
use crate::nails::{NailKey, NailsSetter};

/// Maps a shape-local nail index to a pattern-wide key.
pub type UniqueKeyFn = Arc<dyn Fn(usize) -> NailKey + Send + Sync>;

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("{shape} needs at least {min} nails, got {got}")]
    TooFewNails { shape: &'static str, min: usize, got: usize },
    #[error("{shape} needs at least {min} sides, got {got}")]
    TooFewSides { shape: &'static str, min: usize, got: usize },
    #[error("distortion must be in (-1, 1), got {0}")]
    Distortion(f64),
    #[error("{shape} has a non-positive size")]
    EmptySize { shape: &'static str },
}

pub trait Shape {
    fn nail_count(&self) -> usize;

    fn get_point(&self, index: usize) -> Point;

    /// Key the nail at `index` is registered under.
    fn get_key(&self, index: usize) -> NailKey;

    fn draw_nails(&self, nails: &mut dyn NailsSetter) {
        for index in 0..self.nail_count() {
            nails.add_nail(self.get_key(index), self.get_point(index));
        }
    }

    fn get_bounding_rect(&self) -> BoundingRect;

    /// Width over height of the bounding rect.
    fn get_aspect_ratio(&self) -> f64 {
        self.get_bounding_rect().aspect_ratio()
    }
}

pub(crate) fn key_for(hook: Option<&UniqueKeyFn>, index: usize) -> NailKey {
    match hook {
        Some(hook) => hook(index),
        None => NailKey::Number(index),
    }
}
