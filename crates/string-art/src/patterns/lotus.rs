//! Lotus: nested polygons, each rotated so its corners rest on the sides of
//! the one outside it.

use std::sync::Arc;

use crate::color::{color_controls, colorize_units};
use crate::config::{Config, ControlConfig};
use crate::engine::{PatternDefinition, PatternError};
use crate::geometry::{Dimensions, PI2};
use crate::nails::{NailKey, NailsSetter};
use crate::shapes::{Polygon, PolygonConfig, Shape};
use crate::steps::Steps;

use super::polygon::laps;
use super::util::{margin_control, rotation, rotation_control};

#[derive(Debug, Clone, Copy, Default)]
pub struct Lotus;

/// One polygon per layer, outermost first.
pub type LotusLayers = Vec<Arc<Polygon>>;

impl PatternDefinition for Lotus {
    type Calc = LotusLayers;

    fn id(&self) -> &'static str {
        "lotus"
    }

    fn name(&self) -> &'static str {
        "Lotus"
    }

    fn controls(&self) -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("sides", "Sides", 6.0, 3.0, 20.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("density", "Density", 40.0, 2.0, 200.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("layers", "Layers", 4.0, 1.0, 12.0, 1.0)
                .structural()
                .affects_step_count(),
            ControlConfig::range("layerAngle", "Layer angle", 0.5, 0.0, 1.0, 0.01).structural(),
            margin_control(),
            rotation_control(),
            color_controls(),
        ]
    }

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<LotusLayers, PatternError> {
        let sides = config.count("sides");
        let density = config.count("density");
        let per_layer = sides * density;
        let offset = config.number("layerAngle") * PI2 / sides.max(1) as f64;

        let outer = PolygonConfig::new(sides, density, size)
            .with_margin(config.number("margin"))
            .with_rotation(rotation(config))
            .with_fit_size(false);
        let mut layers = vec![Arc::new(Polygon::new(outer)?)];

        for layer in 1..config.count("layers").max(1) {
            let previous = &layers[layer - 1];
            let inner = PolygonConfig::new(sides, density, size)
                .with_center(previous.get_center_point())
                .with_radius(previous.inner_layer_radius(offset))
                .with_rotation(previous.config().rotation + offset / PI2);
            let polygon = Polygon::new(inner)?
                .with_unique_key(Arc::new(move |index| NailKey::Number(layer * per_layer + index)));
            layers.push(Arc::new(polygon));
        }
        Ok(layers)
    }

    fn draw_nails(&self, calc: &LotusLayers, nails: &mut dyn NailsSetter) {
        for polygon in calc {
            polygon.draw_nails(nails);
        }
    }

    fn draw_strings(&self, calc: Arc<LotusLayers>, config: &Config) -> Steps {
        let rings = calc.len();
        let steps = (0..rings).flat_map(move |layer| laps(Arc::clone(&calc[layer])));
        colorize_units(config, steps, self.get_step_count(config), rings)
    }

    fn get_step_count(&self, config: &Config) -> usize {
        config.count("layers").max(1) * config.count("sides") * config.count("density")
    }

    fn get_nail_count(&self, config: &Config) -> usize {
        self.get_step_count(config)
    }
}
