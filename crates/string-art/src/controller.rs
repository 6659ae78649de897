//! The pen: turns steps into renderer calls.
//!
//! The controller borrows the nail registry and the renderer for the length
//! of one call and keeps its state in a [`Pen`] owned by the engine, so the
//! pen survives between `goto` calls while the borrows do not.

use crate::nails::{NailError, NailKey, Nails};
use crate::renderer::Renderer;
use crate::steps::{LayerStart, Step};

/// A color layer as it was started during a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: Option<String>,
    pub color: Option<String>,
    /// Index of the first string drawn in this layer.
    pub start_step: usize,
}

/// Persistent pen state for one draw.
#[derive(Debug, Clone, Default)]
pub struct Pen {
    position: Option<NailKey>,
    last_string: Option<(usize, usize)>,
    strings: usize,
    layers: Vec<Layer>,
}

impl Pen {
    /// Where the pen currently rests.
    pub fn position(&self) -> Option<&NailKey> {
        self.position.as_ref()
    }

    /// Strings drawn since the pen was created.
    pub fn strings(&self) -> usize {
        self.strings
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Nail numbers of the last string.
    pub fn last_string(&self) -> Option<(usize, usize)> {
        self.last_string
    }
}

pub struct Controller<'a> {
    nails: &'a Nails,
    renderer: &'a mut dyn Renderer,
    pen: &'a mut Pen,
}

impl<'a> Controller<'a> {
    pub fn new(nails: &'a Nails, renderer: &'a mut dyn Renderer, pen: &'a mut Pen) -> Self {
        Self { nails, renderer, pen }
    }

    /// Move the pen without drawing.
    pub fn goto(&mut self, key: &NailKey) -> Result<(), NailError> {
        self.nails.resolve(key)?;
        self.pen.position = Some(key.clone());
        Ok(())
    }

    /// Draw from the pen to `key` and leave the pen there.
    pub fn string_to(&mut self, key: &NailKey) -> Result<(), NailError> {
        let from_key = self
            .pen
            .position
            .as_ref()
            .ok_or_else(|| NailError::PenNotPlaced(key.clone()))?;
        let from = self.nails.resolve(from_key)?;
        let to = self.nails.resolve(key)?;
        let numbers = (self.nails.number_of(from_key)?, self.nails.number_of(key)?);

        self.renderer.render_line(from, to);
        log::trace!("string {} -> {}", numbers.0, numbers.1);

        self.pen.last_string = Some(numbers);
        self.pen.position = Some(key.clone());
        self.pen.strings += 1;
        Ok(())
    }

    pub fn start_layer(&mut self, layer: &LayerStart) {
        if let Some(color) = &layer.color {
            self.renderer.set_color(color);
        }
        self.pen.layers.push(Layer {
            name: layer.name.clone(),
            color: layer.color.clone(),
            start_step: self.pen.strings,
        });
    }

    pub fn get_last_string_nail_numbers(&self) -> Option<(usize, usize)> {
        self.pen.last_string
    }

    /// Run one step: layer, pen move, string.
    pub fn apply(&mut self, step: &Step) -> Result<(), NailError> {
        if let Some(layer) = &step.layer {
            self.start_layer(layer);
        }
        if let Some(from) = &step.from {
            self.goto(from)?;
        }
        self.string_to(&step.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Dimensions, Point};
    use crate::nails::NailsSetter;
    use crate::renderer::{RecordingRenderer, RenderCommand};

    fn nails() -> Nails {
        let mut nails = Nails::default();
        nails.add_nail(NailKey::Number(0), Point::new(0.0, 0.0));
        nails.add_nail(NailKey::Number(1), Point::new(10.0, 0.0));
        nails.add_nail(NailKey::from("top"), Point::new(10.0, 10.0));
        nails
    }

    #[test]
    fn steps_draw_lines_and_track_numbers() {
        let nails = nails();
        let mut renderer = RecordingRenderer::new(Dimensions::square(20.0));
        let mut pen = Pen::default();
        let mut controller = Controller::new(&nails, &mut renderer, &mut pen);

        controller
            .apply(&Step::line(0usize, 1usize).with_layer(LayerStart::color("red").with_name("first")))
            .unwrap();
        controller.apply(&Step::to("top")).unwrap();
        assert_eq!(controller.get_last_string_nail_numbers(), Some((1, 2)));

        assert_eq!(pen.strings(), 2);
        assert_eq!(pen.position(), Some(&NailKey::from("top")));
        assert_eq!(
            pen.layers(),
            &[Layer { name: Some("first".into()), color: Some("red".into()), start_step: 0 }]
        );
        assert_eq!(
            renderer.commands(),
            &[
                RenderCommand::SetColor("red".into()),
                RenderCommand::Line { from: Point::new(0.0, 0.0), to: Point::new(10.0, 0.0) },
                RenderCommand::Line { from: Point::new(10.0, 0.0), to: Point::new(10.0, 10.0) },
            ]
        );
    }

    #[test]
    fn unknown_nail_fails_without_drawing() {
        let nails = nails();
        let mut renderer = RecordingRenderer::new(Dimensions::square(20.0));
        let mut pen = Pen::default();
        let mut controller = Controller::new(&nails, &mut renderer, &mut pen);

        controller.goto(&NailKey::Number(0)).unwrap();
        assert_eq!(
            controller.string_to(&NailKey::Number(9)),
            Err(NailError::UnknownNail(NailKey::Number(9)))
        );
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn string_needs_a_placed_pen() {
        let nails = nails();
        let mut renderer = RecordingRenderer::new(Dimensions::square(20.0));
        let mut pen = Pen::default();
        let mut controller = Controller::new(&nails, &mut renderer, &mut pen);
        assert_eq!(
            controller.apply(&Step::to(1usize)),
            Err(NailError::PenNotPlaced(NailKey::Number(1)))
        );
    }
}
