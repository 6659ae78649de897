//! Controls and layout helpers shared by the bundled patterns.

use crate::config::{Config, ControlConfig};
use crate::geometry::Dimensions;
use crate::shapes::CircleConfig;

pub fn margin_control() -> ControlConfig {
    ControlConfig::range("margin", "Margin", 20.0, 0.0, 200.0, 1.0).structural()
}

/// Rotation in degrees.
pub fn rotation_control() -> ControlConfig {
    ControlConfig::range("rotation", "Rotation", 0.0, 0.0, 360.0, 1.0).structural()
}

pub fn distortion_control() -> ControlConfig {
    ControlConfig::range("distortion", "Distortion", 0.0, -0.99, 0.99, 0.01).structural()
}

/// The `rotation` control as a fraction of a turn.
pub fn rotation(config: &Config) -> f64 {
    config.number("rotation") / 360.0
}

/// A circle of `n` nails filling `size`, with margin, rotation and
/// distortion read from the shared controls.
pub fn circle_config(config: &Config, n: usize, size: Dimensions) -> CircleConfig {
    CircleConfig::new(n, size)
        .with_margin(config.number("margin"))
        .with_rotation(rotation(config))
        .with_distortion(config.number("distortion"))
}

/// Radius of the largest circle inside `size` minus `margin`.
pub fn inner_radius(config: &Config, size: Dimensions) -> f64 {
    size.min_side() / 2.0 - config.number("margin")
}
