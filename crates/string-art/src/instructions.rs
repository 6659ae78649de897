//! Threading instructions: the nail numbers to follow by hand.
//!
//! A full draw is replayed one step at a time into a [`RecordingRenderer`];
//! after each step the controller reports which nails the string joined.
//! Consecutive strings that share a nail form a run; a new run starts
//! wherever the thread has to be cut and restarted elsewhere.

use std::fmt;

use serde::Serialize;

use crate::engine::{Artwork, DrawOptions, PatternError};
use crate::geometry::Dimensions;
use crate::renderer::RecordingRenderer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInstructions {
    pub name: String,
    pub color: Option<String>,
    /// Each run is a nail sequence threaded without lifting the string.
    pub runs: Vec<Vec<usize>>,
}

impl LayerInstructions {
    fn push(&mut self, from: usize, to: usize) {
        match self.runs.last_mut() {
            Some(run) if run.last() == Some(&from) => run.push(to),
            _ => self.runs.push(vec![from, to]),
        }
    }

    /// Strings in this layer.
    pub fn string_count(&self) -> usize {
        self.runs.iter().map(|run| run.len() - 1).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instructions {
    pub pattern: String,
    pub step_count: usize,
    pub layers: Vec<LayerInstructions>,
}

impl Instructions {
    /// Replay the whole pattern on a canvas of `size`.
    pub fn collect(art: &mut dyn Artwork, size: Dimensions) -> Result<Self, PatternError> {
        let mut renderer = RecordingRenderer::new(size);
        art.draw(&mut renderer, DrawOptions::to_position(0))?;

        let mut layers: Vec<LayerInstructions> = Vec::new();
        // Layers of `art.layers()` already turned into entries.
        let mut consumed = 0;
        let mut position = 0;
        loop {
            let outcome = art.draw_batch(&mut renderer, 1, None)?;
            if outcome.position() > position {
                position = outcome.position();
                let started = art.layers();
                for layer in &started[consumed.min(started.len())..] {
                    let index = layers.len() + 1;
                    layers.push(LayerInstructions {
                        name: layer.name.clone().unwrap_or_else(|| format!("Layer {}", index)),
                        color: layer.color.clone(),
                        runs: Vec::new(),
                    });
                }
                consumed = started.len();
                if layers.is_empty() {
                    // Strings drawn before the pattern opened any layer.
                    layers.push(LayerInstructions { name: "Layer 1".to_string(), color: None, runs: Vec::new() });
                }
                if let (Some((from, to)), Some(current)) = (art.last_string_nail_numbers(), layers.last_mut()) {
                    current.push(from, to);
                }
            }
            if outcome.is_complete() {
                break;
            }
        }
        log::debug!("collected {} layers over {} steps", layers.len(), position);

        Ok(Self { pattern: art.id().to_string(), step_count: position, layers })
    }
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in &self.layers {
            write!(f, "{}", layer.name)?;
            if let Some(color) = &layer.color {
                write!(f, " ({})", color)?;
            }
            let runs: Vec<String> = layer
                .runs
                .iter()
                .map(|run| run.iter().map(usize::to_string).collect::<Vec<_>>().join(" → "))
                .collect();
            writeln!(f, ": {}", runs.join(" / "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{Config, ControlConfig};
    use crate::engine::{PatternDefinition, StringArt};
    use crate::geometry::Point;
    use crate::nails::{NailKey, NailsSetter};
    use crate::patterns::Pattern;
    use crate::steps::{LayerStart, Step, Steps};
    use pretty_assertions::assert_eq;

    #[test]
    fn parabola_is_one_run() {
        let mut art = Pattern::Parabola.create_with(&Config::new().with("n", 2.0)).unwrap();
        let instructions = Instructions::collect(art.as_mut(), Dimensions::square(100.0)).unwrap();

        assert_eq!(instructions.step_count, 2);
        assert_eq!(
            instructions.layers,
            vec![LayerInstructions {
                name: "Layer 1".into(),
                color: Some("#ffffff".into()),
                runs: vec![vec![0, 1, 2]],
            }]
        );
        assert_eq!(instructions.to_string(), "Layer 1 (#ffffff): 0 → 1 → 2\n");
    }

    /// Two strings on four nails; only the second one opens a layer.
    #[derive(Debug, Clone, Copy)]
    struct LateLayer;

    impl PatternDefinition for LateLayer {
        type Calc = ();

        fn id(&self) -> &'static str {
            "late_layer"
        }

        fn name(&self) -> &'static str {
            "Late layer"
        }

        fn controls(&self) -> Vec<ControlConfig> {
            Vec::new()
        }

        fn get_calc(&self, _config: &Config, _size: Dimensions) -> Result<(), PatternError> {
            Ok(())
        }

        fn draw_nails(&self, _calc: &(), nails: &mut dyn NailsSetter) {
            for i in 0..4usize {
                nails.add_nail(NailKey::Number(i), Point::new(10.0 + 20.0 * i as f64, 50.0));
            }
        }

        fn draw_strings(&self, _calc: Arc<()>, _config: &Config) -> Steps {
            Box::new(
                vec![
                    Step::line(0usize, 1usize),
                    Step::line(2usize, 3usize).with_layer(LayerStart::color("#00ff00").with_name("Second")),
                ]
                .into_iter(),
            )
        }

        fn get_step_count(&self, _config: &Config) -> usize {
            2
        }

        fn get_nail_count(&self, _config: &Config) -> usize {
            4
        }
    }

    #[test]
    fn layer_opened_after_the_first_string_is_kept() {
        let mut art = StringArt::new(LateLayer).unwrap();
        let instructions = Instructions::collect(&mut art, Dimensions::square(100.0)).unwrap();

        assert_eq!(
            instructions.layers,
            vec![
                LayerInstructions { name: "Layer 1".into(), color: None, runs: vec![vec![0, 1]] },
                LayerInstructions {
                    name: "Second".into(),
                    color: Some("#00ff00".into()),
                    runs: vec![vec![2, 3]],
                },
            ]
        );
    }

    #[test]
    fn one_entry_per_color_layer() {
        let partial = Config::new()
            .with("n", 12.0)
            .with("isMultiColor", true)
            .with("colorCount", 3.0);
        let mut art = Pattern::Circle.create_with(&partial).unwrap();
        let instructions = Instructions::collect(art.as_mut(), Dimensions::square(100.0)).unwrap();

        let names: Vec<&str> = instructions.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Color 1", "Color 2", "Color 3"]);
        let strings: usize = instructions.layers.iter().map(LayerInstructions::string_count).sum();
        assert_eq!(strings, 12);
    }
}
