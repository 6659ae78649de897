//! Parabola: the classic first string-art piece. Two lines meet at a corner
//! and nail `i` of one connects to nail `i` of the other, so the strings
//! envelope a parabolic curve.

use std::sync::Arc;

use crate::color::{color_controls, colorize};
use crate::config::{Config, ControlConfig};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::{Dimensions, Point};
use crate::nails::{NailKey, NailsSetter};
use crate::shapes::{Line, LineConfig, Pivot, Shape};
use crate::steps::{Step, Steps};

use super::util::{margin_control, rotation, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct Parabola;

/// The two arms, sharing the corner nail.
#[derive(Debug)]
pub struct Arms {
    pub a: Line,
    pub b: Line,
}

fn arm_key(arm: char, index: usize) -> NailKey {
    NailKey::Name(format!("{}{}", arm, index))
}

impl PatternDefinition for Parabola {
    type Calc = Arms;

    fn id(&self) -> &'static str {
        "parabola"
    }

    fn name(&self) -> &'static str {
        "Parabola"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("n", "Nails per line", 40.0, 2.0, 200.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("angle", "Corner angle", 90.0, 10.0, 170.0, 1.0).structural(),
            margin_control(),
            rotation_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<Arms, PatternError> {
        let n = config.count("n");
        let margin = config.number("margin");
        let length = size.min_side() - 2.0 * margin;
        let center = size.center();
        let corner = Point::new(center.x - length / 2.0, center.y + length / 2.0);

        // Arm a runs down into the corner, arm b leaves it to the right.
        let opening = config.number("angle").to_radians();
        let top = Point::new(corner.x + length * opening.cos(), corner.y - length * opening.sin());
        let right = Point::new(corner.x + length, corner.y);

        let turn = rotation(config);
        let a = Line::new(LineConfig::new(top, corner, n).with_rotation(turn, Pivot::Point(center)))?
            .with_unique_key(Arc::new(|index| arm_key('a', index)));
        let b = Line::new(LineConfig::new(corner, right, n).with_rotation(turn, Pivot::Point(center)))?
            .with_unique_key(Arc::new(|index| arm_key('b', index)));
        Ok(Arms { a, b })
    }

    fn draw_nails(&self, calc: &Arms, nails: &mut dyn NailsSetter) {
        calc.a.draw_nails(nails);
        calc.b.draw_nails(nails);
    }

    fn draw_strings(&self, _calc: Arc<Arms>, config: &Config) -> Steps {
        let steps = (0..config.count("n")).map(|i| Step::line(arm_key('a', i), arm_key('b', i)));
        colorize(config, steps, self.get_step_count(config))
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("n")
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        2 * config.count("n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::get_config_default_values;
    use crate::nails::Nails;
    use crate::patterns::testing::check_counts;

    #[test]
    fn counts_match() {
        check_counts(Parabola, &Config::new());
        check_counts(Parabola, &Config::new().with("n", 2.0).with("angle", 45.0).with("rotation", 30.0));
    }

    #[test]
    fn corner_nail_is_shared() {
        let config = Config::merged(
            &get_config_default_values(&Parabola.controls()),
            &Config::new().with("n", 10.0),
        );
        let arms = Parabola.get_calc(&config, Dimensions::square(200.0)).unwrap();
        let mut nails = Nails::default();
        Parabola.draw_nails(&arms, &mut nails);

        assert_eq!(nails.len(), 20);
        assert_eq!(nails.unique_count(), 19);
        assert_eq!(nails.number_of(&arm_key('a', 9)), nails.number_of(&arm_key('b', 0)));
    }
}
