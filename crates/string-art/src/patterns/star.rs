//! Star: curves stitched between neighboring arms.

use std::sync::Arc;

use crate::color::{color_controls, colorize};
use crate::config::{Config, ControlConfig, Formula};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::Dimensions;
use crate::nails::NailsSetter;
use crate::shapes::{Shape, StarShape, StarShapeConfig};
use crate::steps::Steps;

use super::util::{inner_radius, margin_control, rotation, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct Star;

/// Rounds of threading, as `StarShape` clamps them.
fn curve_size(config: &Config) -> usize {
    let side_nails = config.count("sideNails").max(1);
    config.count("maxCurveSize").clamp(1, side_nails)
}

impl PatternDefinition for Star {
    type Calc = StarShape;

    fn id(&self) -> &'static str {
        "star"
    }

    fn name(&self) -> &'static str {
        "Star"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("sides", "Sides", 5.0, 2.0, 20.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("sideNails", "Nails per side", 40.0, 1.0, 200.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("centerRadius", "Center radius", 0.0, 0.0, 0.9, 0.01).structural(),
            ControlConfig::range("maxCurveSize", "Max curve size", 40.0, 1.0, 200.0, 1.0)
                .with_default_formula(Formula::key("sideNails"))
                .with_max(Formula::key("sideNails"))
                .affects_step_count(),
            margin_control(),
            rotation_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<StarShape, PatternError> {
        let radius = inner_radius(config, size);
        let star_config = StarShapeConfig::new(config.count("sides"), config.count("sideNails"), size.center(), radius)
            .with_center_radius(radius * config.number("centerRadius"))
            .with_rotation(rotation(config))
            .with_max_curve_size(curve_size(config));
        Ok(StarShape::new(star_config)?)
    }

    fn draw_nails(&self, calc: &StarShape, nails: &mut dyn NailsSetter) {
        calc.draw_nails(nails);
    }

    fn draw_strings(&self, calc: Arc<StarShape>, config: &Config) -> Steps {
        colorize(config, calc.threading(), self.get_step_count(config))
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("sides") * curve_size(config)
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        config.count("sides") * config.count("sideNails")
    }
}
