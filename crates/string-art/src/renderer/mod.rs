//! Rendering backends.
//!
//! The engine never draws by itself: the controller turns steps into calls on
//! a [`Renderer`]. Two backends ship with the crate:
//!
//! - [`RecordingRenderer`] keeps every call in memory (tests, instructions)
//! - [`SvgRenderer`] accumulates strokes and writes an SVG document
//!
//! ## Rust Lesson #27: Trait Objects
//!
//! The engine takes `&mut dyn Renderer` rather than a generic parameter so a
//! host can pick the backend at runtime (the CLI chooses by file extension).
//! The trait must stay *object safe* for that: no generic methods, no `Self`
//! in return position.

mod recording;
mod svg;

pub use recording::{RecordingRenderer, RenderCommand};
pub use svg::{SvgError, SvgRenderer};

use crate::geometry::{Dimensions, Point};
use crate::nails::{NailsGroupOptions, NumberedNail};

pub trait Renderer {
    /// Canvas size. The engine rebuilds geometry whenever this changes.
    fn get_size(&self) -> Dimensions;

    /// Clear every string drawn so far.
    fn reset_strings(&mut self);

    fn reset_nails(&mut self);

    fn set_line_width(&mut self, width: f64);

    /// Stroke color for the following lines.
    fn set_color(&mut self, color: &str);

    /// `None` leaves the canvas transparent.
    fn set_background(&mut self, color: Option<&str>);

    fn render_line(&mut self, from: Point, to: Point);

    /// A polyline through `points`.
    fn render_lines(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            self.render_line(pair[0], pair[1]);
        }
    }

    fn render_nails_group(&mut self, group: &str, nails: &[NumberedNail], options: &NailsGroupOptions);
}
