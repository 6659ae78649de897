//! Palettes and step-to-color maps.
//!
//! A pattern is either a single color or a multicolor ramp: `color_count`
//! HSL colors spread over a hue range (or, alternatively, over lightness).
//! The ramp can be mirrored, reversed, and repeated. Colors are assigned to
//! contiguous bands of steps, see [`ColorEngine::get_color_map`].

use crate::config::{Config, ControlConfig, Predicate};
use crate::steps::{LayerStart, Step, Steps};

/// The color options a pattern exposes, mirrored from its config.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    pub color: String,
    pub is_multi_color: bool,
    pub color_count: usize,
    /// Hue of the first color, in degrees.
    pub multicolor_start: f64,
    /// Degrees of hue covered by the ramp.
    pub multicolor_range: f64,
    pub multicolor_by_lightness: bool,
    pub saturation: f64,
    pub max_lightness: f64,
    pub min_lightness: f64,
    pub reverse_colors: bool,
    pub repeat_colors: bool,
    pub mirror_colors: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            is_multi_color: false,
            color_count: 7,
            multicolor_start: 237.0,
            multicolor_range: 360.0,
            multicolor_by_lightness: false,
            saturation: 80.0,
            max_lightness: 60.0,
            min_lightness: 30.0,
            reverse_colors: false,
            repeat_colors: false,
            mirror_colors: false,
        }
    }
}

impl ColorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            color: config.text("color").to_string(),
            is_multi_color: config.flag("isMultiColor"),
            color_count: config.count("colorCount"),
            multicolor_start: config.number("multicolorStart"),
            multicolor_range: config.number("multicolorRange"),
            multicolor_by_lightness: config.flag("multicolorByLightness"),
            saturation: config.number("saturation"),
            max_lightness: config.number("maxLightness"),
            min_lightness: config.number("minLightness"),
            reverse_colors: config.flag("reverseColors"),
            repeat_colors: config.flag("repeatColors"),
            mirror_colors: config.flag("mirrorColors"),
        }
    }
}

/// Color controls shared by every pattern, under a "Color" group.
pub fn color_controls() -> ControlConfig {
    let defaults = ColorConfig::default();
    let multi = Predicate::flag("isMultiColor");
    ControlConfig::group(
        "colorGroup",
        "Color",
        vec![
            ControlConfig::color("color", "String color", &defaults.color)
                .with_show(Predicate::not_flag("isMultiColor")),
            ControlConfig::checkbox("isMultiColor", "Use multiple colors", defaults.is_multi_color),
            ControlConfig::range("colorCount", "Colors count", defaults.color_count as f64, 1.0, 20.0, 1.0)
                .with_show(multi.clone()),
            ControlConfig::range("multicolorStart", "Multicolor start", defaults.multicolor_start, 0.0, 360.0, 1.0)
                .with_show(multi.clone()),
            ControlConfig::range("multicolorRange", "Multicolor range", defaults.multicolor_range, 1.0, 360.0, 1.0)
                .with_show(Predicate::All(vec![
                    multi.clone(),
                    Predicate::not_flag("multicolorByLightness"),
                ])),
            ControlConfig::checkbox(
                "multicolorByLightness",
                "Multicolor by lightness",
                defaults.multicolor_by_lightness,
            )
            .with_show(multi.clone()),
            ControlConfig::range("saturation", "Saturation", defaults.saturation, 0.0, 100.0, 1.0)
                .with_show(multi.clone()),
            ControlConfig::range("maxLightness", "Max lightness", defaults.max_lightness, 0.0, 100.0, 1.0)
                .with_show(multi.clone()),
            ControlConfig::range("minLightness", "Min lightness", defaults.min_lightness, 0.0, 100.0, 1.0)
                .with_show(Predicate::All(vec![multi.clone(), Predicate::flag("multicolorByLightness")])),
            ControlConfig::checkbox("reverseColors", "Reverse colors", defaults.reverse_colors)
                .with_show(multi.clone()),
            ControlConfig::checkbox("repeatColors", "Repeat colors", defaults.repeat_colors)
                .with_show(multi.clone()),
            ControlConfig::checkbox("mirrorColors", "Mirror colors", defaults.mirror_colors)
                .with_show(multi),
        ],
    )
}

fn hsl(hue: f64, saturation: f64, lightness: f64) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        hue.rem_euclid(360.0).round(),
        saturation.round(),
        lightness.round()
    )
}

/// Step index -> color, for the first step of each band.
///
/// Keys are strictly increasing; a color lasts until the next entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorMap {
    entries: Vec<(usize, String)>,
}

impl ColorMap {
    pub fn entries(&self) -> &[(usize, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color starting exactly at `step`, if a band begins there.
    pub fn starting_at(&self, step: usize) -> Option<&str> {
        self.entries
            .binary_search_by_key(&step, |(s, _)| *s)
            .ok()
            .map(|i| self.entries[i].1.as_str())
    }

    /// Color in effect at `step`.
    pub fn color_at(&self, step: usize) -> Option<&str> {
        let i = self.entries.partition_point(|(s, _)| *s <= step);
        i.checked_sub(1).map(|i| self.entries[i].1.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorEngine {
    config: ColorConfig,
    colors: Vec<String>,
}

impl ColorEngine {
    pub fn new(config: ColorConfig) -> Self {
        let colors = Self::palette(&config);
        Self { config, colors }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ColorConfig::from_config(config))
    }

    fn palette(config: &ColorConfig) -> Vec<String> {
        if !config.is_multi_color {
            return vec![config.color.clone()];
        }

        let count = config.color_count.max(1);
        let mut colors: Vec<String> = (0..count)
            .map(|i| {
                if config.multicolor_by_lightness {
                    let t = if count > 1 { i as f64 / (count - 1) as f64 } else { 0.0 };
                    let lightness = config.max_lightness + (config.min_lightness - config.max_lightness) * t;
                    hsl(config.multicolor_start, config.saturation, lightness)
                } else {
                    let hue = config.multicolor_start + config.multicolor_range * i as f64 / count as f64;
                    hsl(hue, config.saturation, config.max_lightness)
                }
            })
            .collect();

        if config.mirror_colors {
            let back: Vec<String> = colors.iter().rev().skip(1).cloned().collect();
            colors.extend(back);
        }
        if config.reverse_colors {
            colors.reverse();
        }
        colors
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Number of distinct bands a draw is split into.
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Color `index`, wrapping when `repeat_colors`, clamping otherwise.
    pub fn get_color(&self, index: usize) -> &str {
        let len = self.colors.len();
        let index = if self.config.repeat_colors { index % len } else { index.min(len - 1) };
        &self.colors[index]
    }

    /// Split `step_count` steps into `color_count` equal bands
    /// (`floor(step_count / color_count)` steps each, the remainder staying
    /// with the last color) and record where each band starts.
    pub fn get_color_map(&self, step_count: usize, color_count: usize) -> ColorMap {
        let color_count = color_count.max(1);
        let band = (step_count / color_count).max(1);
        let entries = (0..color_count)
            .map(|i| (i * band, self.get_color(i).to_string()))
            .filter(|(start, _)| *start == 0 || *start < step_count)
            .collect();
        ColorMap { entries }
    }

    /// Bands for a pattern drawn in `units` natural parts (times-table
    /// layers, lotus rings): one per unit, and never fewer than the palette.
    /// A single color stays a single band.
    pub fn band_count(&self, units: usize) -> usize {
        if self.config.is_multi_color {
            units.max(self.color_count())
        } else {
            1
        }
    }

    /// Start a new layer at every band boundary of `steps`, splitting them
    /// into `color_count` bands.
    pub fn with_color_map(&self, steps: Steps, step_count: usize, color_count: usize) -> Steps {
        let map = self.get_color_map(step_count, color_count);
        let multi = self.config.is_multi_color;
        let mut layers: Vec<(usize, LayerStart)> = map
            .entries
            .into_iter()
            .enumerate()
            .map(|(band, (start, color))| {
                let layer = LayerStart::color(color);
                let layer = if multi { layer.with_name(format!("Color {}", band + 1)) } else { layer };
                (start, layer)
            })
            .collect();
        layers.reverse();

        Box::new(steps.enumerate().map(move |(i, step)| {
            if layers.last().is_some_and(|(start, _)| *start == i) {
                if let Some((_, layer)) = layers.pop() {
                    return step.with_layer(layer);
                }
            }
            step
        }))
    }
}

/// Convenience for patterns: color `steps` from the config's color options,
/// one band per palette color.
pub fn colorize(config: &Config, steps: impl Iterator<Item = Step> + 'static, step_count: usize) -> Steps {
    let engine = ColorEngine::from_config(config);
    let bands = engine.color_count();
    engine.with_color_map(Box::new(steps), step_count, bands)
}

/// Like [`colorize`], for patterns made of `units` parts. Bands past the end
/// of the palette follow `repeatColors`: wrap around, or hold the last color.
pub fn colorize_units(
    config: &Config,
    steps: impl Iterator<Item = Step> + 'static,
    step_count: usize,
    units: usize,
) -> Steps {
    let engine = ColorEngine::from_config(config);
    let bands = engine.band_count(units);
    engine.with_color_map(Box::new(steps), step_count, bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn multi(count: usize) -> ColorConfig {
        ColorConfig {
            is_multi_color: true,
            color_count: count,
            multicolor_start: 0.0,
            multicolor_range: 360.0,
            saturation: 80.0,
            max_lightness: 50.0,
            ..ColorConfig::default()
        }
    }

    #[test]
    fn solid_color() {
        let engine = ColorEngine::new(ColorConfig { color: "#ff0000".into(), ..ColorConfig::default() });
        assert_eq!(engine.colors(), &["#ff0000".to_string()]);
        assert_eq!(engine.get_color(5), "#ff0000");
    }

    #[test]
    fn hue_ramp() {
        let engine = ColorEngine::new(multi(4));
        assert_eq!(
            engine.colors(),
            &[
                "hsl(0, 80%, 50%)".to_string(),
                "hsl(90, 80%, 50%)".to_string(),
                "hsl(180, 80%, 50%)".to_string(),
                "hsl(270, 80%, 50%)".to_string(),
            ]
        );
    }

    #[test]
    fn lightness_ramp() {
        let engine = ColorEngine::new(ColorConfig {
            multicolor_by_lightness: true,
            max_lightness: 80.0,
            min_lightness: 20.0,
            ..multi(3)
        });
        assert_eq!(
            engine.colors(),
            &[
                "hsl(0, 80%, 80%)".to_string(),
                "hsl(0, 80%, 50%)".to_string(),
                "hsl(0, 80%, 20%)".to_string(),
            ]
        );
    }

    #[test]
    fn mirror_then_reverse() {
        let mirrored = ColorEngine::new(ColorConfig { mirror_colors: true, ..multi(3) });
        let hues: Vec<&str> = mirrored.colors().iter().map(|c| &c[4..7]).collect();
        assert_eq!(hues, vec!["0, ", "120", "240", "120", "0, "]);

        let reversed = ColorEngine::new(ColorConfig {
            mirror_colors: true,
            reverse_colors: true,
            ..multi(2)
        });
        assert_eq!(reversed.color_count(), 3);
        assert_eq!(reversed.get_color(0), "hsl(0, 80%, 50%)");
        assert_eq!(reversed.get_color(1), "hsl(180, 80%, 50%)");
    }

    #[test]
    fn single_mirrored_color_stays_single() {
        let engine = ColorEngine::new(ColorConfig { mirror_colors: true, ..multi(1) });
        assert_eq!(engine.color_count(), 1);
    }

    #[test]
    fn get_color_wraps_or_clamps() {
        let clamped = ColorEngine::new(multi(3));
        assert_eq!(clamped.get_color(7), clamped.get_color(2));

        let repeated = ColorEngine::new(ColorConfig { repeat_colors: true, ..multi(3) });
        assert_eq!(repeated.get_color(7), repeated.get_color(1));
    }

    #[test]
    fn color_map_bands() {
        let engine = ColorEngine::new(multi(3));
        let map = engine.get_color_map(10, 3);
        let starts: Vec<usize> = map.entries().iter().map(|(s, _)| *s).collect();
        assert_eq!(starts, vec![0, 3, 6]);
        // The remainder stays with the last color.
        assert_eq!(map.color_at(9), Some(engine.get_color(2)));
        assert_eq!(map.starting_at(3), Some(engine.get_color(1)));
        assert_eq!(map.starting_at(4), None);
    }

    #[test]
    fn color_map_degenerate_counts() {
        let engine = ColorEngine::new(multi(5));
        // More colors than steps: one step per color, extras dropped.
        let starts: Vec<usize> = engine.get_color_map(3, 5).entries().iter().map(|(s, _)| *s).collect();
        assert_eq!(starts, vec![0, 1, 2]);
        // Zero colors clamps to one.
        assert_eq!(engine.get_color_map(10, 0).len(), 1);
    }

    #[test]
    fn extra_bands_wrap_or_hold() {
        fn band_colors(engine: &ColorEngine) -> Vec<String> {
            let bands = engine.band_count(4);
            let steps: Steps = Box::new((0..8usize).map(Step::to));
            engine
                .with_color_map(steps, 8, bands)
                .filter_map(|step| step.layer.and_then(|l| l.color))
                .collect()
        }

        let held = ColorEngine::new(multi(2));
        let (a, b) = (held.get_color(0).to_string(), held.get_color(1).to_string());
        assert_eq!(band_colors(&held), vec![a.clone(), b.clone(), b.clone(), b.clone()]);

        let wrapped = ColorEngine::new(ColorConfig { repeat_colors: true, ..multi(2) });
        assert_eq!(band_colors(&wrapped), vec![a.clone(), b.clone(), a, b]);
    }

    #[test]
    fn band_count_keeps_every_color() {
        assert_eq!(ColorEngine::new(multi(5)).band_count(2), 5);
        assert_eq!(ColorEngine::new(multi(2)).band_count(6), 6);
        assert_eq!(ColorEngine::new(ColorConfig::default()).band_count(6), 1);
    }

    #[test]
    fn steps_get_layers_at_boundaries() {
        let engine = ColorEngine::new(multi(2));
        let steps: Steps = Box::new((0..5usize).map(Step::to));
        let colored: Vec<Step> = engine.with_color_map(steps, 5, 2).collect();
        let layered: Vec<usize> = colored
            .iter()
            .enumerate()
            .filter(|(_, s)| s.layer.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(layered, vec![0, 2]);
        assert_eq!(colored[2].layer.as_ref().and_then(|l| l.name.as_deref()), Some("Color 2"));
    }
}
