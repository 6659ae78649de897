//! Maurer rose: a closed walk over points of the rose curve `r = sin(nθ)`,
//! stepping `d` degrees at a time.

use std::sync::Arc;

use crate::color::{color_controls, colorize};
use crate::config::{Config, ControlConfig};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::{Dimensions, PI2, Point};
use crate::nails::{NailKey, NailsSetter};
use crate::shapes::ShapeError;
use crate::steps::{Step, Steps};

use super::util::{inner_radius, margin_control, rotation, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct MaurerRose;

/// The walk's points, in threading order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoseWalk {
    pub points: Vec<Point>,
}

impl RoseWalk {
    pub fn new(n: f64, degrees: f64, count: usize, center: Point, radius: f64, rotation: f64) -> Self {
        let points = (0..count)
            .map(|k| {
                let theta = (k as f64 * degrees).to_radians();
                let r = radius * (n * theta).sin();
                let angle = theta + rotation * PI2;
                Point::new(center.x + r * angle.sin(), center.y - r * angle.cos())
            })
            .collect();
        Self { points }
    }
}

impl PatternDefinition for MaurerRose {
    type Calc = RoseWalk;

    fn id(&self) -> &'static str {
        "maurer_rose"
    }

    fn name(&self) -> &'static str {
        "Maurer Rose"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("n", "Petals (n)", 4.0, 1.0, 12.0, 1.0).structural(),
            ControlConfig::range("degrees", "Step angle (d)", 29.0, 1.0, 359.0, 1.0).structural(),
            ControlConfig::range("points", "Points", 360.0, 36.0, 720.0, 1.0)
                .structural()
                .affects_step_count(),
            margin_control(),
            rotation_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<RoseWalk, PatternError> {
        let count = config.count("points");
        if count < 2 {
            return Err(ShapeError::TooFewNails { shape: "maurer rose", min: 2, got: count }.into());
        }
        let radius = inner_radius(config, size);
        if radius.is_nan() || radius <= 0.0 {
            return Err(ShapeError::EmptySize { shape: "maurer rose" }.into());
        }
        Ok(RoseWalk::new(
            config.number("n"),
            config.number("degrees"),
            count,
            size.center(),
            radius,
            rotation(config),
        ))
    }

    fn draw_nails(&self, calc: &RoseWalk, nails: &mut dyn NailsSetter) {
        for (k, point) in calc.points.iter().enumerate() {
            nails.add_nail(NailKey::Number(k), *point);
        }
    }

    fn draw_strings(&self, calc: Arc<RoseWalk>, config: &Config) -> Steps {
        let count = calc.points.len();
        let steps = (1..=count).map(move |k| {
            let to = k % count;
            if k == 1 {
                Step::line(0usize, to)
            } else {
                Step::to(to)
            }
        });
        colorize(config, steps, self.get_step_count(config))
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("points")
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        config.count("points")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::testing::check_counts;

    #[test]
    fn counts_match() {
        check_counts(MaurerRose, &Config::new());
        check_counts(MaurerRose, &Config::new().with("n", 7.0).with("degrees", 19.0).with("points", 100.0));
    }

    #[test]
    fn walk_starts_at_the_center() {
        let walk = RoseWalk::new(4.0, 29.0, 10, Point::new(50.0, 50.0), 40.0, 0.0);
        assert_eq!(walk.points.len(), 10);
        assert!(walk.points[0].distance(Point::new(50.0, 50.0)) < 1e-9);
    }
}
