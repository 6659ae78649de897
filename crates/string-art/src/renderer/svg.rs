//! SVG output.
//!
//! Strokes are buffered as paths, one per run of lines sharing color and
//! width; a line starting where the previous one ended extends the current
//! subpath instead of opening a new one, so a continuous thread stays a
//! single polyline. Nails are written on top of the strings.

use std::fmt::Write as _;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::geometry::{Dimensions, Point, round_to};
use crate::nails::{NailsGroupOptions, NumberedNail};

use super::Renderer;

const DEFAULT_STROKE: &str = "#000000";
const DEFAULT_NAIL_COLOR: &str = "#000000";

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("failed to write SVG: {0}")]
    Write(String),
    #[error("SVG output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone)]
struct StrokeRun {
    color: String,
    width: f64,
    path: String,
    last: Option<Point>,
}

#[derive(Debug, Clone)]
struct NailsLayer {
    group: String,
    nails: Vec<NumberedNail>,
    options: NailsGroupOptions,
}

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    size: Dimensions,
    background: Option<String>,
    color: String,
    line_width: f64,
    runs: Vec<StrokeRun>,
    nails: Vec<NailsLayer>,
}

fn coord(value: f64) -> f64 {
    let rounded = round_to(value, 3);
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SvgError> {
    writer
        .write_event(event)
        .map_err(|e| SvgError::Write(e.to_string()))
}

impl SvgRenderer {
    pub fn new(size: Dimensions) -> Self {
        Self {
            size,
            background: None,
            color: DEFAULT_STROKE.to_string(),
            line_width: 1.0,
            runs: Vec::new(),
            nails: Vec::new(),
        }
    }

    /// Number of `<path>` elements the strings will produce.
    pub fn path_count(&self) -> usize {
        self.runs.len()
    }

    fn current_run(&mut self) -> &mut StrokeRun {
        let reusable = self
            .runs
            .last()
            .is_some_and(|run| run.color == self.color && run.width == self.line_width);
        if !reusable {
            self.runs.push(StrokeRun {
                color: self.color.clone(),
                width: self.line_width,
                path: String::new(),
                last: None,
            });
        }
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Serialize everything rendered so far.
    pub fn to_svg(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let width = coord(self.size.width).to_string();
        let height = coord(self.size.height).to_string();
        let view_box = format!("0 0 {} {}", width, height);
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        svg.push_attribute(("width", width.as_str()));
        svg.push_attribute(("height", height.as_str()));
        svg.push_attribute(("viewBox", view_box.as_str()));
        emit(&mut writer, Event::Start(svg))?;

        if let Some(background) = &self.background {
            let mut rect = BytesStart::new("rect");
            rect.push_attribute(("width", "100%"));
            rect.push_attribute(("height", "100%"));
            rect.push_attribute(("fill", background.as_str()));
            emit(&mut writer, Event::Empty(rect))?;
        }

        let mut strings = BytesStart::new("g");
        strings.push_attribute(("id", "strings"));
        strings.push_attribute(("fill", "none"));
        strings.push_attribute(("stroke-linecap", "round"));
        strings.push_attribute(("stroke-linejoin", "round"));
        emit(&mut writer, Event::Start(strings))?;
        for run in self.runs.iter().filter(|run| !run.path.is_empty()) {
            let stroke_width = coord(run.width).to_string();
            let mut path = BytesStart::new("path");
            path.push_attribute(("stroke", run.color.as_str()));
            path.push_attribute(("stroke-width", stroke_width.as_str()));
            path.push_attribute(("d", run.path.as_str()));
            emit(&mut writer, Event::Empty(path))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("g")))?;

        for layer in &self.nails {
            self.write_nails(&mut writer, layer)?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("svg")))?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write_nails(&self, writer: &mut Writer<Vec<u8>>, layer: &NailsLayer) -> Result<(), SvgError> {
        let fill = layer.options.color.as_deref().unwrap_or(DEFAULT_NAIL_COLOR);
        let id = format!("nails-{}", layer.group);
        let mut group = BytesStart::new("g");
        group.push_attribute(("id", id.as_str()));
        group.push_attribute(("fill", fill));
        emit(writer, Event::Start(group))?;

        let radius = coord(layer.options.radius).to_string();
        for nail in &layer.nails {
            let cx = coord(nail.point.x).to_string();
            let cy = coord(nail.point.y).to_string();
            let mut circle = BytesStart::new("circle");
            circle.push_attribute(("cx", cx.as_str()));
            circle.push_attribute(("cy", cy.as_str()));
            circle.push_attribute(("r", radius.as_str()));
            emit(writer, Event::Empty(circle))?;
        }

        if layer.options.show_numbers {
            let font_size = coord(layer.options.font_size).to_string();
            for nail in &layer.nails {
                let x = coord(nail.point.x + layer.options.radius * 1.5).to_string();
                let y = coord(nail.point.y - layer.options.radius * 1.5).to_string();
                let number = nail.number.to_string();
                let mut text = BytesStart::new("text");
                text.push_attribute(("x", x.as_str()));
                text.push_attribute(("y", y.as_str()));
                text.push_attribute(("font-size", font_size.as_str()));
                emit(writer, Event::Start(text))?;
                emit(writer, Event::Text(BytesText::new(&number)))?;
                emit(writer, Event::End(BytesEnd::new("text")))?;
            }
        }

        emit(writer, Event::End(BytesEnd::new("g")))
    }
}

impl Renderer for SvgRenderer {
    fn get_size(&self) -> Dimensions {
        self.size
    }

    fn reset_strings(&mut self) {
        self.runs.clear();
    }

    fn reset_nails(&mut self) {
        self.nails.clear();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    fn set_background(&mut self, color: Option<&str>) {
        self.background = color.map(str::to_string);
    }

    fn render_line(&mut self, from: Point, to: Point) {
        let run = self.current_run();
        let continues = run
            .last
            .is_some_and(|last| coord(last.x) == coord(from.x) && coord(last.y) == coord(from.y));
        if !continues {
            if !run.path.is_empty() {
                run.path.push(' ');
            }
            let _ = write!(run.path, "M{} {}", coord(from.x), coord(from.y));
        }
        let _ = write!(run.path, " L{} {}", coord(to.x), coord(to.y));
        run.last = Some(to);
    }

    fn render_nails_group(&mut self, group: &str, nails: &[NumberedNail], options: &NailsGroupOptions) {
        self.nails.push(NailsLayer {
            group: group.to_string(),
            nails: nails.to_vec(),
            options: options.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_lines_share_a_subpath() {
        let mut renderer = SvgRenderer::new(Dimensions::square(100.0));
        renderer.set_color("#ff0000");
        renderer.render_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        renderer.render_line(Point::new(10.0, 0.0), Point::new(10.0, 10.5));
        renderer.render_line(Point::new(50.0, 50.0), Point::new(60.0, 60.0));

        let svg = renderer.to_svg().unwrap();
        assert_eq!(renderer.path_count(), 1);
        assert!(svg.contains(r#"d="M0 0 L10 0 L10 10.5 M50 50 L60 60""#), "{}", svg);
        assert!(svg.contains(r##"stroke="#ff0000""##));
    }

    #[test]
    fn color_change_starts_new_path() {
        let mut renderer = SvgRenderer::new(Dimensions::square(100.0));
        renderer.set_color("red");
        renderer.render_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        renderer.set_color("blue");
        renderer.render_line(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(renderer.path_count(), 2);
    }

    #[test]
    fn document_has_background_and_nails() {
        let mut renderer = SvgRenderer::new(Dimensions::new(200.0, 100.0));
        renderer.set_background(Some("#0e0e0e"));
        let options = NailsGroupOptions {
            show_numbers: true,
            ..NailsGroupOptions::default()
        };
        renderer.render_nails_group(
            "default",
            &[NumberedNail { number: 7, point: Point::new(5.0, 5.0) }],
            &options,
        );

        let svg = renderer.to_svg().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r##"fill="#0e0e0e""##));
        assert!(svg.contains(r#"<circle cx="5" cy="5" r="1.5"/>"#), "{}", svg);
        assert!(svg.contains(">7</text>"));
    }

    #[test]
    fn reset_strings_drops_paths() {
        let mut renderer = SvgRenderer::new(Dimensions::square(10.0));
        renderer.render_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        renderer.reset_strings();
        assert_eq!(renderer.path_count(), 0);
        assert!(!renderer.to_svg().unwrap().contains("<path"));
    }
}
