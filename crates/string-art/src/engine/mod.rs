//! The drawing engine.
//!
//! [`StringArt`] wraps a [`PatternDefinition`] and runs it: it owns the
//! config, builds the derived geometry (`Calc`) and nails on demand, and
//! plays the pattern's steps into a renderer, pausing and resuming anywhere.
//!
//! ```text
//! Uninitialized --init_draw--> Initialized --draw_next--> Drawing { k } --> Done
//!       ^                                                                  |
//!       +------------ structural config change / canvas resize ------------+
//! ```
//!
//! Seeking forward resumes the live step sequence; seeking backward redraws
//! from the first step, reusing the cached geometry.

mod artwork;
mod controls;

pub use artwork::Artwork;
pub use controls::{common_controls, nails_options};

use std::iter::Peekable;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::config::{
    get_config_default_values, get_controls_index, leaf_controls, validate_controls, Config,
    ConfigError, ControlConfig,
};
use crate::controller::{Controller, Pen};
use crate::geometry::Dimensions;
use crate::nails::{NailError, Nails, NailsSetter};
use crate::renderer::Renderer;
use crate::shapes::ShapeError;
use crate::steps::Steps;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Nail(#[from] NailError),
    #[error("canvas has no area ({width}x{height})")]
    EmptyCanvas { width: f64, height: f64 },
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
}

/// What a concrete pattern provides to the engine.
///
/// ## Rust Lesson #26: Associated Types
///
/// Every pattern derives different geometry from its config (a circle, a
/// stack of polygons, a star...). `type Calc` lets each implementation name
/// its own geometry type while the engine stays generic: the engine only
/// caches it in an `Arc` and hands it back.
pub trait PatternDefinition {
    type Calc: 'static;

    /// Stable identifier, used in share links and saved patterns.
    fn id(&self) -> &'static str;

    /// Display name.
    fn name(&self) -> &'static str;

    /// Pattern-specific controls. The engine appends [`common_controls`].
    fn controls(&self) -> Vec<ControlConfig>;

    fn get_calc(&self, config: &Config, size: Dimensions) -> Result<Self::Calc, PatternError>;

    fn draw_nails(&self, calc: &Self::Calc, nails: &mut dyn NailsSetter);

    /// The full threading, lazily. Must yield exactly `get_step_count` steps.
    fn draw_strings(&self, calc: Arc<Self::Calc>, config: &Config) -> Steps;

    fn get_step_count(&self, config: &Config) -> usize;

    /// Number of nail keys `draw_nails` registers.
    fn get_nail_count(&self, config: &Config) -> usize;

    /// Preferred canvas width over height.
    fn get_aspect_ratio(&self, _config: &Config) -> f64 {
        1.0
    }
}

/// Cooperative cancellation flag, shareable with another thread.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    /// Stop after this many steps. `None` draws everything.
    pub position: Option<usize>,
    pub abort: Option<AbortSignal>,
    /// Clear and re-render nails even when they are already on the canvas.
    pub redraw_nails: bool,
}

impl DrawOptions {
    /// Draw everything, nails included.
    pub fn full() -> Self {
        Self { position: None, abort: None, redraw_nails: true }
    }

    pub fn to_position(position: usize) -> Self {
        Self { position: Some(position), ..Self::full() }
    }

    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = Some(abort);
        self
    }

    pub fn with_redraw_nails(mut self, redraw_nails: bool) -> Self {
        self.redraw_nails = redraw_nails;
        self
    }
}

/// How a draw call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Every step was drawn.
    Complete { position: usize },
    /// Stopped at the requested position; more steps remain.
    Paused { position: usize },
    /// Stopped by an [`AbortSignal`]. The canvas holds a consistent partial drawing.
    Aborted { position: usize },
}

impl DrawOutcome {
    pub fn position(&self) -> usize {
        match *self {
            DrawOutcome::Complete { position }
            | DrawOutcome::Paused { position }
            | DrawOutcome::Aborted { position } => position,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DrawOutcome::Complete { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Uninitialized,
    /// Geometry and nails are built, nothing drawn yet.
    Initialized,
    Drawing { position: usize },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawEvent {
    DrawDone { position: usize },
    /// Geometry and nails were dropped and will be rebuilt on the next draw.
    StructureReset,
}

pub type EventListener = Box<dyn FnMut(&DrawEvent)>;

/// The engine for one pattern instance.
pub struct StringArt<P: PatternDefinition> {
    pattern: P,
    controls: Vec<ControlConfig>,
    defaults: Config,
    config: Config,
    size: Option<Dimensions>,
    calc: Option<Arc<P::Calc>>,
    nails: Option<Nails>,
    calc_builds: usize,
    nails_dirty: bool,
    strings: Option<Peekable<Steps>>,
    pen: Pen,
    position: usize,
    state: DrawState,
    listeners: Vec<EventListener>,
}

impl<P: PatternDefinition> StringArt<P> {
    pub fn new(pattern: P) -> Result<Self, PatternError> {
        let mut controls = pattern.controls();
        controls.extend(common_controls());
        validate_controls(&controls)?;
        let defaults = get_config_default_values(&controls);

        Ok(Self {
            pattern,
            controls,
            config: defaults.clone(),
            defaults,
            size: None,
            calc: None,
            nails: None,
            calc_builds: 0,
            nails_dirty: true,
            strings: None,
            pen: Pen::default(),
            position: 0,
            state: DrawState::Uninitialized,
            listeners: Vec::new(),
        })
    }

    /// Builder-style partial config.
    pub fn with_config(mut self, partial: &Config) -> Result<Self, PatternError> {
        self.assign(partial)?;
        Ok(self)
    }

    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    /// How many times geometry was computed. Seeking forward never adds to it.
    pub fn calc_builds(&self) -> usize {
        self.calc_builds
    }

    pub fn nails(&self) -> Option<&Nails> {
        self.nails.as_ref()
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// The config with formula defaults evaluated.
    pub fn resolved_config(&self) -> Config {
        let mut resolved = self.config.clone();
        for control in leaf_controls(&self.controls) {
            if resolved.get(&control.key).is_none_or(|v| v.is_null()) {
                resolved.set(control.key.clone(), control.resolve_default(&self.config));
            }
        }
        resolved
    }

    fn emit(&mut self, event: DrawEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn check_partial(&self, partial: &Config) -> Result<(), ConfigError> {
        let index = get_controls_index(&self.controls);
        for (key, value) in partial.iter() {
            let control = index
                .get(key)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            control.validate_value(value)?;
        }
        Ok(())
    }

    fn assign(&mut self, partial: &Config) -> Result<(), PatternError> {
        self.check_partial(partial)?;
        let next = Config::merged(&self.config, partial);
        self.replace_config(next);
        Ok(())
    }

    fn replace_config(&mut self, next: Config) {
        let structural = {
            let changed = self.config.changed_keys(&next);
            if changed.is_empty() {
                return;
            }
            let index = get_controls_index(&self.controls);
            changed.iter().any(|key| index.get(key).is_some_and(|c| c.is_structural))
        };
        self.config = next;

        if structural {
            self.reset_structure();
        } else {
            // Colors and widths are read when a sequence starts.
            self.strings = None;
            self.position = 0;
            self.nails_dirty = true;
            if self.state != DrawState::Uninitialized {
                self.state = DrawState::Initialized;
            }
        }
    }

    /// Drop geometry, nails, and the live sequence.
    pub fn reset_structure(&mut self) {
        self.calc = None;
        self.nails = None;
        self.strings = None;
        self.position = 0;
        self.nails_dirty = true;
        self.state = DrawState::Uninitialized;
        self.emit(DrawEvent::StructureReset);
    }

    fn ensure_structure(&mut self, config: &Config, size: Dimensions) -> Result<bool, PatternError> {
        if self.calc.is_some() && self.nails.is_some() {
            return Ok(false);
        }
        let calc = Arc::new(self.pattern.get_calc(config, size)?);
        self.calc_builds += 1;

        let mut nails = Nails::new(nails_options(config));
        self.pattern.draw_nails(&calc, &mut nails);
        log::debug!(
            "built {} geometry for {}x{}: {} nails, {} unique",
            self.pattern.id(),
            size.width,
            size.height,
            nails.len(),
            nails.unique_count()
        );

        self.calc = Some(calc);
        self.nails = Some(nails);
        Ok(true)
    }

    /// Prepare the canvas and a fresh step sequence.
    ///
    /// Rebuilds geometry when missing or when the canvas size changed, clears
    /// the strings, applies background and line width, and renders nails when
    /// they were rebuilt, changed, or `redraw_nails` asks for it.
    pub fn init_draw(&mut self, renderer: &mut dyn Renderer, redraw_nails: bool) -> Result<(), PatternError> {
        let size = renderer.get_size();
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(PatternError::EmptyCanvas { width: size.width, height: size.height });
        }
        if self.size.is_some_and(|previous| previous != size) {
            log::debug!("canvas resized to {}x{}", size.width, size.height);
            self.reset_structure();
        }
        self.size = Some(size);

        let config = self.resolved_config();
        let rebuilt = self.ensure_structure(&config, size)?;

        renderer.reset_strings();
        let background = config.flag("enableBackground").then(|| config.text("backgroundColor"));
        renderer.set_background(background);
        renderer.set_line_width(config.number("stringWidth"));

        if rebuilt || redraw_nails || self.nails_dirty {
            renderer.reset_nails();
            if let Some(nails) = self.nails.as_mut() {
                nails.set_default_options(nails_options(&config));
                if config.flag("showNails") {
                    nails.render(renderer);
                }
            }
            self.nails_dirty = false;
        }

        self.pen = Pen::default();
        self.position = 0;
        self.strings = match (&self.calc, config.flag("showStrings")) {
            (Some(calc), true) => Some(self.pattern.draw_strings(Arc::clone(calc), &config).peekable()),
            _ => None,
        };
        self.state = DrawState::Initialized;
        Ok(())
    }

    /// Draw one step. Returns `false` once the sequence is exhausted.
    pub fn draw_next(&mut self, renderer: &mut dyn Renderer) -> Result<bool, PatternError> {
        let (Some(strings), Some(nails)) = (self.strings.as_mut(), self.nails.as_ref()) else {
            return Ok(false);
        };
        let Some(step) = strings.next() else {
            return Ok(false);
        };
        Controller::new(nails, renderer, &mut self.pen).apply(&step)?;
        self.position += 1;
        self.state = DrawState::Drawing { position: self.position };
        Ok(true)
    }

    fn is_exhausted(&mut self) -> bool {
        self.strings.as_mut().is_none_or(|strings| strings.peek().is_none())
    }

    fn finish(&mut self) -> DrawOutcome {
        self.strings = None;
        if self.state != DrawState::Done {
            self.state = DrawState::Done;
            log::debug!("{} done after {} steps", self.pattern.id(), self.position);
            self.emit(DrawEvent::DrawDone { position: self.position });
        }
        DrawOutcome::Complete { position: self.position }
    }

    fn advance(
        &mut self,
        renderer: &mut dyn Renderer,
        target: Option<usize>,
        abort: Option<&AbortSignal>,
    ) -> Result<DrawOutcome, PatternError> {
        loop {
            if target.is_some_and(|target| self.position >= target) {
                if self.is_exhausted() {
                    return Ok(self.finish());
                }
                return Ok(DrawOutcome::Paused { position: self.position });
            }
            if abort.is_some_and(AbortSignal::is_aborted) {
                log::debug!("draw aborted at step {}", self.position);
                self.strings = None;
                return Ok(DrawOutcome::Aborted { position: self.position });
            }
            if !self.draw_next(renderer)? {
                return Ok(self.finish());
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config::ConfigValue;
    use crate::geometry::Point;
    use crate::nails::NailKey;
    use crate::renderer::{RecordingRenderer, RenderCommand};
    use crate::steps::{LayerStart, Step};

    /// Nails in a row, each string hopping to the next one.
    #[derive(Debug, Clone, Copy)]
    struct Row;

    impl PatternDefinition for Row {
        type Calc = Vec<Point>;

        fn id(&self) -> &'static str {
            "row"
        }

        fn name(&self) -> &'static str {
            "Row"
        }

        fn controls(&self) -> Vec<ControlConfig> {
            vec![
                ControlConfig::range("n", "Nails", 5.0, 2.0, 50.0, 1.0)
                    .structural()
                    .affects_step_count(),
                ControlConfig::color("color", "Color", "#ff0000"),
            ]
        }

        fn get_calc(&self, config: &Config, size: Dimensions) -> Result<Vec<Point>, PatternError> {
            let n = config.count("n");
            Ok((0..n)
                .map(|i| Point::new(size.width * i as f64 / n as f64, size.height / 2.0))
                .collect())
        }

        fn draw_nails(&self, calc: &Vec<Point>, nails: &mut dyn NailsSetter) {
            for (i, point) in calc.iter().enumerate() {
                nails.add_nail(NailKey::Number(i), *point);
            }
        }

        fn draw_strings(&self, calc: Arc<Vec<Point>>, config: &Config) -> Steps {
            let color = config.text("color").to_string();
            Box::new((1..calc.len()).map(move |i| {
                let step = Step::line(i - 1, i);
                if i == 1 { step.with_layer(LayerStart::color(color.clone())) } else { step }
            }))
        }

        fn get_step_count(&self, config: &Config) -> usize {
            config.count("n").saturating_sub(1)
        }

        fn get_nail_count(&self, config: &Config) -> usize {
            config.count("n")
        }
    }

    fn canvas() -> RecordingRenderer {
        RecordingRenderer::new(Dimensions::square(100.0))
    }

    fn record_events(art: &mut StringArt<Row>) -> Rc<RefCell<Vec<DrawEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        art.on_event(Box::new(move |event: &DrawEvent| sink.borrow_mut().push(*event)));
        events
    }

    #[test]
    fn full_draw_fires_done_once() {
        let mut art = StringArt::new(Row).unwrap();
        let events = record_events(&mut art);
        let mut renderer = canvas();

        let outcome = art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: 4 });
        assert_eq!(art.state(), DrawState::Done);
        assert_eq!(renderer.lines().len(), 4);

        assert_eq!(art.goto(&mut renderer, 4).unwrap(), DrawOutcome::Complete { position: 4 });
        assert_eq!(*events.borrow(), vec![DrawEvent::DrawDone { position: 4 }]);
    }

    #[test]
    fn forward_goto_resumes_without_rebuilding() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();

        let outcome = art.draw(&mut renderer, DrawOptions::to_position(2)).unwrap();
        assert_eq!(outcome, DrawOutcome::Paused { position: 2 });
        assert_eq!(art.state(), DrawState::Drawing { position: 2 });

        assert_eq!(art.goto(&mut renderer, 3).unwrap(), DrawOutcome::Paused { position: 3 });
        assert_eq!(art.goto(&mut renderer, 4).unwrap(), DrawOutcome::Complete { position: 4 });
        assert_eq!(art.calc_builds(), 1);

        let mut full = canvas();
        StringArt::new(Row).unwrap().draw(&mut full, DrawOptions::full()).unwrap();
        assert_eq!(renderer.lines(), full.lines());
    }

    #[test]
    fn backward_goto_redraws_from_cache() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::full()).unwrap();
        let nail_renders = |r: &RecordingRenderer| {
            r.commands().iter().filter(|c| matches!(c, RenderCommand::NailsGroup { .. })).count()
        };
        assert_eq!(nail_renders(&renderer), 1);

        assert_eq!(art.goto(&mut renderer, 1).unwrap(), DrawOutcome::Paused { position: 1 });
        assert_eq!(renderer.lines().len(), 1);
        assert_eq!(art.calc_builds(), 1);
        assert_eq!(nail_renders(&renderer), 1);
    }

    #[test]
    fn target_past_the_end_completes() {
        let mut art = StringArt::new(Row).unwrap();
        let outcome = art.draw(&mut canvas(), DrawOptions::to_position(99)).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: 4 });
    }

    #[test]
    fn structural_change_resets_structure() {
        let mut art = StringArt::new(Row).unwrap();
        let events = record_events(&mut art);
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::full()).unwrap();

        art.set_config_value("n", ConfigValue::Number(8.0)).unwrap();
        assert_eq!(art.state(), DrawState::Uninitialized);
        assert!(art.nails().is_none());
        assert_eq!(art.step_count(), 7);

        let outcome = art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: 7 });
        assert_eq!(art.calc_builds(), 2);
        assert_eq!(
            *events.borrow(),
            vec![
                DrawEvent::DrawDone { position: 4 },
                DrawEvent::StructureReset,
                DrawEvent::DrawDone { position: 7 },
            ]
        );
    }

    #[test]
    fn color_change_keeps_geometry() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::full()).unwrap();

        art.set_config_value("color", ConfigValue::from("#00ff00")).unwrap();
        assert_eq!(art.state(), DrawState::Initialized);

        art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(art.calc_builds(), 1);
        assert_eq!(renderer.colors().last(), Some(&"#00ff00"));
    }

    #[test]
    fn config_change_rewinds_position() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::to_position(3)).unwrap();
        assert_eq!(art.position(), 3);

        art.set_config_value("color", ConfigValue::from("#00ff00")).unwrap();
        assert_eq!(art.state(), DrawState::Initialized);
        assert_eq!(art.position(), 0);

        assert_eq!(art.goto(&mut renderer, 2).unwrap(), DrawOutcome::Paused { position: 2 });
        art.set_config_value("n", ConfigValue::Number(9.0)).unwrap();
        assert_eq!(art.position(), 0);
    }

    #[test]
    fn equal_config_is_not_a_change() {
        let mut art = StringArt::new(Row).unwrap();
        let events = record_events(&mut art);
        art.draw(&mut canvas(), DrawOptions::full()).unwrap();

        art.set_config_value("n", ConfigValue::Number(5.0)).unwrap();
        assert_eq!(art.state(), DrawState::Done);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn canvas_resize_rebuilds() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::full()).unwrap();

        renderer.resize(Dimensions::square(300.0));
        art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(art.calc_builds(), 2);
        assert_eq!(renderer.lines().last().map(|(_, to)| *to), Some(Point::new(240.0, 150.0)));
    }

    #[test]
    fn abort_leaves_partial_drawing() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        let abort = AbortSignal::new();

        art.draw_batch(&mut renderer, 2, Some(&abort)).unwrap();
        abort.abort();
        let outcome = art.draw_batch(&mut renderer, 2, Some(&abort)).unwrap();
        assert_eq!(outcome, DrawOutcome::Aborted { position: 2 });
        assert_eq!(renderer.lines().len(), 2);

        let outcome = art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: 4 });
    }

    #[test]
    fn batches_advance_to_the_end() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = canvas();
        assert_eq!(art.draw_batch(&mut renderer, 3, None).unwrap(), DrawOutcome::Paused { position: 3 });
        assert_eq!(art.draw_batch(&mut renderer, 3, None).unwrap(), DrawOutcome::Complete { position: 4 });
        assert_eq!(art.draw_batch(&mut renderer, 3, None).unwrap(), DrawOutcome::Complete { position: 4 });
        assert_eq!(renderer.lines().len(), 4);
    }

    #[test]
    fn empty_canvas_is_an_error() {
        let mut art = StringArt::new(Row).unwrap();
        let mut renderer = RecordingRenderer::new(Dimensions::new(0.0, 100.0));
        assert!(matches!(
            art.draw(&mut renderer, DrawOptions::full()),
            Err(PatternError::EmptyCanvas { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut art = StringArt::new(Row).unwrap();
        assert!(matches!(
            art.set_config_value("sides", ConfigValue::Number(3.0)),
            Err(PatternError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            art.set_config_value("color", ConfigValue::from("not a color")),
            Err(PatternError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn hidden_strings_draw_nothing() {
        let mut art = StringArt::new(Row)
            .unwrap()
            .with_config(&Config::new().with("showStrings", false))
            .unwrap();
        let mut renderer = canvas();
        let outcome = art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: 0 });
        assert!(renderer.lines().is_empty());
    }
}
