//! Comet: chords of a fixed jump across a circle whose nails are spaced by
//! an easing curve, so the chords crowd into a bright head and thin out
//! into a tail.

use std::sync::Arc;

use crate::color::{color_controls, colorize};
use crate::config::{Config, ControlConfig, Predicate, SelectOption};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::Dimensions;
use crate::nails::NailsSetter;
use crate::shapes::{distortion_to_aspect_ratio, Circle, Easing, Shape};
use crate::steps::{Step, Steps};

use super::util::{circle_config, distortion_control, margin_control, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct Comet;

const EASINGS: [&str; 6] = ["linear", "easeIn", "easeOut", "easeInOut", "fastSlowFast", "slowFastSlow"];

fn displacement(config: &Config) -> Easing {
    let name = config.text("displacement");
    Easing::from_name(name, config.number("displacementAmount")).unwrap_or_else(|| {
        log::warn!("unknown displacement {:?}, using linear", name);
        Easing::Linear
    })
}

/// Nails skipped by each chord, at least one.
fn jump(config: &Config, n: usize) -> usize {
    ((n as f64 * config.number("jump")).round() as usize).clamp(1, n.saturating_sub(1).max(1))
}

impl PatternDefinition for Comet {
    type Calc = Circle;

    fn id(&self) -> &'static str {
        "comet"
    }

    fn name(&self) -> &'static str {
        "Comet"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        let options = EASINGS.iter().map(|name| SelectOption::new(*name, name)).collect();
        vec![
            ControlConfig::range("n", "Number of nails", 200.0, 3.0, 600.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("jump", "Jump", 0.45, 0.01, 0.99, 0.01),
            ControlConfig::select("displacement", "Displacement", "fastSlowFast", options).structural(),
            ControlConfig::range("displacementAmount", "Displacement amount", 0.6, 0.05, 1.0, 0.05)
                .with_show(Predicate::Not(Box::new(Predicate::equals("displacement", "linear"))))
                .structural(),
            margin_control(),
            rotation_control(),
            distortion_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<Circle, PatternError> {
        let circle_config = circle_config(config, config.count("n"), size).with_displacement(displacement(config));
        Ok(Circle::new(circle_config)?)
    }

    fn draw_nails(&self, calc: &Circle, nails: &mut dyn NailsSetter) {
        calc.draw_nails(nails);
    }

    fn draw_strings(&self, calc: Arc<Circle>, config: &Config) -> Steps {
        let n = calc.nail_count();
        let jump = jump(config, n);
        let steps = (0..n).map(move |i| Step::line(i, (i + jump) % n));
        colorize(config, steps, self.get_step_count(config))
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("n")
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        config.count("n")
    }

    fn get_aspect_ratio(&self, config: &Config) -> f64 {
        distortion_to_aspect_ratio(config.number("distortion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::testing::check_counts;

    #[test]
    fn counts_match() {
        check_counts(Comet, &Config::new());
        check_counts(Comet, &Config::new().with("n", 51.0).with("displacement", "easeIn"));
        check_counts(Comet, &Config::new().with("displacement", "linear").with("jump", 0.99));
    }

    #[test]
    fn jump_stays_inside_the_circle() {
        assert_eq!(jump(&Config::new().with("jump", 0.99), 3), 2);
        assert_eq!(jump(&Config::new().with("jump", 0.01), 10), 1);
        assert_eq!(jump(&Config::new().with("jump", 0.5), 200), 100);
    }

    #[test]
    fn unknown_easing_falls_back_to_linear() {
        let config = Config::new().with("displacement", "wobble").with("displacementAmount", 0.5);
        assert_eq!(displacement(&config), Easing::Linear);
    }
}
