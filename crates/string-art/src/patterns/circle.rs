//! Times tables on a circle.
//!
//! Nail `i` connects to nail `i * multiplier (mod n)`. Extra layers repeat
//! the table with the multiplier raised by `layerSpread` each time, which is
//! where the cardioid (x2) turns into nephroids and beyond.

use std::sync::Arc;

use crate::color::{color_controls, colorize_units};
use crate::config::{Config, ControlConfig, Predicate};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::Dimensions;
use crate::nails::NailsSetter;
use crate::shapes::{distortion_to_aspect_ratio, Circle, Shape};
use crate::steps::{Step, Steps};

use super::util::{circle_config, distortion_control, margin_control, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimesTables;

fn times(i: usize, multiplier: f64, n: usize) -> usize {
    (i as f64 * multiplier).round() as usize % n
}

impl PatternDefinition for TimesTables {
    type Calc = Circle;

    fn id(&self) -> &'static str {
        "circle"
    }

    fn name(&self) -> &'static str {
        "Times Tables"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("n", "Number of nails", 180.0, 3.0, 500.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("multiplier", "Multiplier", 2.0, 2.0, 100.0, 1.0),
            ControlConfig::range("layers", "Layers", 1.0, 1.0, 10.0, 1.0).affects_step_count(),
            ControlConfig::range("layerSpread", "Layer spread", 1.0, 0.0, 20.0, 1.0)
                .with_show(Predicate::GreaterThan("layers".into(), 1.0)),
            ControlConfig::checkbox("reverse", "Reverse", false).structural(),
            margin_control(),
            rotation_control(),
            distortion_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<Circle, PatternError> {
        let circle_config = circle_config(config, config.count("n"), size).with_reverse(config.flag("reverse"));
        Ok(Circle::new(circle_config)?)
    }

    fn draw_nails(&self, calc: &Circle, nails: &mut dyn NailsSetter) {
        calc.draw_nails(nails);
    }

    fn draw_strings(&self, calc: Arc<Circle>, config: &Config) -> Steps {
        let n = calc.nail_count();
        let multiplier = config.number("multiplier");
        let spread = config.number("layerSpread");
        let layers = config.count("layers").max(1);

        let steps = (0..layers).flat_map(move |layer| {
            let multiplier = multiplier + layer as f64 * spread;
            (0..n).map(move |i| Step::line(i, times(i, multiplier, n)))
        });
        colorize_units(config, steps, self.get_step_count(config), layers)
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("n") * config.count("layers").max(1)
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        config.count("n")
    }

    fn get_aspect_ratio(&self, config: &Config) -> f64 {
        distortion_to_aspect_ratio(config.number("distortion"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
