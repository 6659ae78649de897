//! Regular polygons with nails along their sides.
//!
//! Side `s` runs from vertex `s` to vertex `s + 1`; its nails start at the
//! first vertex and stop one spacing short of the second (which is nail 0 of
//! the next side). With `draw_center`, a center nail and radial nails toward
//! every vertex follow the side nails.

use crate::geometry::{BoundingRect, Dimensions, PI2, Point};
use crate::nails::NailKey;

use super::{Shape, ShapeError, UniqueKeyFn, key_for};

use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonConfig {
    pub sides: usize,
    pub nails_per_side: usize,
    pub size: Dimensions,
    pub margin: f64,
    /// Fraction of a full turn.
    pub rotation: f64,
    pub center: Option<Point>,
    pub radius: Option<f64>,
    /// Scale up so the rotated outline fills the area inside the margins.
    pub fit_size: bool,
    pub draw_center: bool,
}

impl PolygonConfig {
    pub fn new(sides: usize, nails_per_side: usize, size: Dimensions) -> Self {
        Self {
            sides,
            nails_per_side,
            size,
            margin: 0.0,
            rotation: 0.0,
            center: None,
            radius: None,
            fit_size: false,
            draw_center: false,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_fit_size(mut self, fit_size: bool) -> Self {
        self.fit_size = fit_size;
        self
    }

    pub fn with_draw_center(mut self, draw_center: bool) -> Self {
        self.draw_center = draw_center;
        self
    }
}

#[derive(Clone)]
pub struct Polygon {
    config: PolygonConfig,
    center: Point,
    radius: f64,
    vertices: Vec<Point>,
    unique_key: Option<UniqueKeyFn>,
}

impl std::fmt::Debug for Polygon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polygon")
            .field("config", &self.config)
            .field("radius", &self.radius)
            .finish_non_exhaustive()
    }
}

/// Unit-radius vertex `k` of a polygon, vertex 0 pointing up.
fn unit_vertex(sides: usize, rotation: f64, k: usize) -> Point {
    let angle = rotation * PI2 + k as f64 * PI2 / sides as f64;
    Point::new(angle.sin(), -angle.cos())
}

impl Polygon {
    pub fn new(config: PolygonConfig) -> Result<Self, ShapeError> {
        if config.sides < 3 {
            return Err(ShapeError::TooFewSides { shape: "polygon", min: 3, got: config.sides });
        }
        if config.nails_per_side < 1 {
            return Err(ShapeError::TooFewNails {
                shape: "polygon",
                min: 1,
                got: config.nails_per_side,
            });
        }

        let available = Dimensions::new(
            config.size.width - 2.0 * config.margin,
            config.size.height - 2.0 * config.margin,
        );
        let (mut center, mut radius) = (
            config.size.center(),
            config.radius.unwrap_or(available.min_side() / 2.0),
        );

        if config.fit_size && config.radius.is_none() {
            let unit = BoundingRect::from_points(
                (0..config.sides).map(|k| unit_vertex(config.sides, config.rotation, k)),
            )
            .ok_or(ShapeError::EmptySize { shape: "polygon" })?;
            radius = (available.width / unit.width).min(available.height / unit.height);
            // Shift so the outline, not the circumcircle, is centered.
            let offset = unit.center();
            center = Point::new(center.x - offset.x * radius, center.y - offset.y * radius);
        }
        if let Some(explicit) = config.center {
            center = explicit;
        }
        if radius.is_nan() || radius <= 0.0 {
            return Err(ShapeError::EmptySize { shape: "polygon" });
        }

        let vertices = (0..config.sides)
            .map(|k| {
                let unit = unit_vertex(config.sides, config.rotation, k);
                Point::new(center.x + unit.x * radius, center.y + unit.y * radius)
            })
            .collect();

        Ok(Self { config, center, radius, vertices, unique_key: None })
    }

    pub fn with_unique_key(mut self, hook: UniqueKeyFn) -> Self {
        self.unique_key = Some(hook);
        self
    }

    pub fn config(&self) -> &PolygonConfig {
        &self.config
    }

    pub fn sides(&self) -> usize {
        self.config.sides
    }

    pub fn nails_per_side(&self) -> usize {
        self.config.nails_per_side
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Vertex `k`, wrapping around.
    pub fn vertex(&self, k: usize) -> Point {
        self.vertices[k % self.config.sides]
    }

    pub fn side_size(&self) -> f64 {
        2.0 * self.radius * (PI / self.config.sides as f64).sin()
    }

    /// Distance from the center to the middle of a side.
    pub fn get_apothem(&self) -> f64 {
        self.radius * (PI / self.config.sides as f64).cos()
    }

    /// Radius of an inner polygon with the same number of sides, rotated by
    /// `rotation_offset` radians, whose vertices touch this polygon's sides.
    ///
    /// Valid for offsets in `[0, 2π / sides]`.
    pub fn inner_layer_radius(&self, rotation_offset: f64) -> f64 {
        self.get_apothem() / (PI / self.config.sides as f64 - rotation_offset).cos()
    }

    pub fn get_center_point(&self) -> Point {
        self.center
    }

    /// Nail `index` along side `side`, both wrapping.
    pub fn get_side_point(&self, side: usize, index: usize) -> Point {
        let nps = self.config.nails_per_side;
        let side = (side + index / nps) % self.config.sides;
        let t = (index % nps) as f64 / nps as f64;
        self.vertex(side).lerp(self.vertex(side + 1), t)
    }

    /// Radial nail `j` (1-based, `1..nails_per_side`) from the center toward
    /// vertex `side`.
    pub fn get_radial_point(&self, side: usize, j: usize) -> Point {
        let t = j as f64 / self.config.nails_per_side as f64;
        self.center.lerp(self.vertex(side), t)
    }

    fn side_nail_count(&self) -> usize {
        self.config.sides * self.config.nails_per_side
    }

    pub fn side_key(&self, side: usize, index: usize) -> NailKey {
        let nps = self.config.nails_per_side;
        let side = (side + index / nps) % self.config.sides;
        self.get_key(side * nps + index % nps)
    }

    pub fn center_key(&self) -> NailKey {
        self.get_key(self.side_nail_count())
    }

    pub fn radial_key(&self, side: usize, j: usize) -> NailKey {
        let per_radius = self.config.nails_per_side - 1;
        let side = side % self.config.sides;
        self.get_key(self.side_nail_count() + 1 + side * per_radius + (j - 1))
    }
}

impl Shape for Polygon {
    fn nail_count(&self) -> usize {
        let sides = self.side_nail_count();
        if self.config.draw_center {
            sides + 1 + self.config.sides * (self.config.nails_per_side - 1)
        } else {
            sides
        }
    }

    fn get_point(&self, index: usize) -> Point {
        let nps = self.config.nails_per_side;
        let sides = self.side_nail_count();
        if index < sides {
            return self.get_side_point(index / nps, index % nps);
        }
        if index == sides {
            return self.center;
        }
        let radial = index - sides - 1;
        let per_radius = (nps - 1).max(1);
        self.get_radial_point(radial / per_radius, radial % per_radius + 1)
    }

    fn get_key(&self, index: usize) -> NailKey {
        key_for(self.unique_key.as_ref(), index)
    }

    fn get_bounding_rect(&self) -> BoundingRect {
        BoundingRect::from_points(self.vertices.iter().copied())
            .unwrap_or_else(|| BoundingRect::from_edges(0.0, 0.0, 0.0, 0.0))
    }
}

// ============================================================================
// TESTS
// ============================================================================
