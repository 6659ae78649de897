//! A regular polygon threaded side to side, optionally with radial spokes.
//!
//! Every lap starts on side 0 at nail `i` and visits the same nail on each
//! following side, so the laps stack into curves along every corner. With
//! `drawCenter`, each triangle between two neighboring spokes gets its own
//! curve too; the spoke nails sit in a separate `"center"` nail group.

use std::sync::Arc;

use crate::color::{color_controls, colorize};
use crate::config::{Config, ControlConfig};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::Dimensions;
use crate::nails::{NailsGroup, NailsSetter};
use crate::shapes::{Polygon as PolygonShape, PolygonConfig};
use crate::steps::{Step, Steps};

use super::util::{margin_control, rotation, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct Polygon;

pub const CENTER_GROUP: &str = "center";

/// One lap per nail index: from side 0 around every side and back.
pub(super) fn laps(polygon: Arc<PolygonShape>) -> impl Iterator<Item = Step> {
    let sides = polygon.sides();
    (0..polygon.nails_per_side()).flat_map(move |i| {
        let polygon = Arc::clone(&polygon);
        (1..=sides).map(move |side| {
            let to = polygon.side_key(side, i);
            if side == 1 {
                Step::line(polygon.side_key(0, i), to)
            } else {
                Step::to(to)
            }
        })
    })
}

impl PatternDefinition for Polygon {
    type Calc = PolygonShape;

    fn id(&self) -> &'static str {
        "polygon"
    }

    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("sides", "Sides", 5.0, 3.0, 20.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("nailsPerSide", "Nails per side", 40.0, 2.0, 200.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::checkbox("drawCenter", "Draw center", false)
                .structural()
                .affects_step_count(),
            ControlConfig::checkbox("fitSize", "Fit size", true).structural(),
            margin_control(),
            rotation_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<PolygonShape, PatternError> {
        let polygon_config = PolygonConfig::new(config.count("sides"), config.count("nailsPerSide"), size)
            .with_margin(config.number("margin"))
            .with_rotation(rotation(config))
            .with_fit_size(config.flag("fitSize"))
            .with_draw_center(config.flag("drawCenter"));
        Ok(PolygonShape::new(polygon_config)?)
    }

    fn draw_nails(&self, calc: &PolygonShape, nails: &mut dyn NailsSetter) {
        let sides = calc.sides();
        let nps = calc.nails_per_side();
        for side in 0..sides {
            for index in 0..nps {
                nails.add_nail(calc.side_key(side, index), calc.get_side_point(side, index));
            }
        }

        if calc.config().draw_center {
            let mut center = NailsGroup::new(CENTER_GROUP);
            center.add_nail(calc.center_key(), calc.get_center_point());
            for side in 0..sides {
                for j in 1..nps {
                    center.add_nail(calc.radial_key(side, j), calc.get_radial_point(side, j));
                }
            }
            nails.add_group(center);
        }
    }

    fn draw_strings(&self, calc: Arc<PolygonShape>, config: &Config) -> Steps {
        let sides = calc.sides();
        let nps = calc.nails_per_side();

        let outline = laps(Arc::clone(&calc));

        let spokes = config.flag("drawCenter");
        let radial = (0..sides).filter(move |_| spokes).flat_map(move |side| {
            let calc = Arc::clone(&calc);
            (1..nps).map(move |j| Step::line(calc.radial_key(side, j), calc.radial_key(side + 1, nps - j)))
        });

        colorize(config, outline.chain(radial), self.get_step_count(config))
    }

    fn get_step_count(&self, config: &Config) -> usize {
        let sides = config.count("sides");
        let nps = config.count("nailsPerSide");
        let laps = sides * nps;
        if config.flag("drawCenter") {
            laps + sides * nps.saturating_sub(1)
        } else {
            laps
        }
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        let sides = config.count("sides");
        let nps = config.count("nailsPerSide");
        if config.flag("drawCenter") {
            sides * nps + 1 + sides * nps.saturating_sub(1)
        } else {
            sides * nps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nails::Nails;
    use crate::patterns::testing::check_counts;

    #[test]
    fn counts_match() {
        check_counts(Polygon, &Config::new());
        check_counts(Polygon, &Config::new().with("sides", 3.0).with("nailsPerSide", 7.0));
        check_counts(Polygon, &Config::new().with("drawCenter", true).with("fitSize", false));
    }

    #[test]
    fn spokes_get_their_own_group() {
        let partial = Config::new().with("sides", 4.0).with("nailsPerSide", 5.0).with("drawCenter", true);
        let defaults = crate::config::get_config_default_values(&Polygon.controls());
        let config = Config::merged(&defaults, &partial);
        let calc = Polygon.get_calc(&config, Dimensions::square(200.0)).unwrap();
        let mut nails = Nails::default();
        Polygon.draw_nails(&calc, &mut nails);

        let groups: Vec<(String, usize)> = nails
            .groups()
            .map(|(key, _, nails)| (key.to_string(), nails.len()))
            .collect();
        assert_eq!(groups, vec![("default".to_string(), 20), (CENTER_GROUP.to_string(), 1 + 4 * 4)]);
    }
}
