use crate::geometry::{Dimensions, Point};
use crate::nails::{NailsGroupOptions, NumberedNail};

use super::Renderer;

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ResetStrings,
    ResetNails,
    SetLineWidth(f64),
    SetColor(String),
    SetBackground(Option<String>),
    Line { from: Point, to: Point },
    NailsGroup { group: String, nails: Vec<NumberedNail> },
}

/// Renderer that remembers every call, in order.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    size: Dimensions,
    commands: Vec<RenderCommand>,
}

impl RecordingRenderer {
    pub fn new(size: Dimensions) -> Self {
        Self { size, commands: Vec::new() }
    }

    /// Change the reported canvas size, as a resized window would.
    pub fn resize(&mut self, size: Dimensions) {
        self.size = size;
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Lines currently on the canvas: everything since the last string reset.
    pub fn lines(&self) -> Vec<(Point, Point)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == RenderCommand::ResetStrings)
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Line { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// Stroke colors in the order they were set.
    pub fn colors(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetColor(color) => Some(color.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn get_size(&self) -> Dimensions {
        self.size
    }

    fn reset_strings(&mut self) {
        self.commands.push(RenderCommand::ResetStrings);
    }

    fn reset_nails(&mut self) {
        self.commands.push(RenderCommand::ResetNails);
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(RenderCommand::SetLineWidth(width));
    }

    fn set_color(&mut self, color: &str) {
        self.commands.push(RenderCommand::SetColor(color.to_string()));
    }

    fn set_background(&mut self, color: Option<&str>) {
        self.commands.push(RenderCommand::SetBackground(color.map(str::to_string)));
    }

    fn render_line(&mut self, from: Point, to: Point) {
        self.commands.push(RenderCommand::Line { from, to });
    }

    fn render_nails_group(&mut self, group: &str, nails: &[NumberedNail], _options: &NailsGroupOptions) {
        self.commands.push(RenderCommand::NailsGroup {
            group: group.to_string(),
            nails: nails.to_vec(),
        });
    }
}
