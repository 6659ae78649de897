//! Object-safe face of the engine.

use crate::config::{
    deserialize_config, pattern_url, serialize_config, Config, ConfigValue, ControlConfig,
};
use crate::controller::Layer;
use crate::renderer::Renderer;

use super::{
    AbortSignal, DrawOptions, DrawOutcome, DrawState, EventListener, PatternDefinition,
    PatternError, StringArt,
};

/// A pattern instance behind `dyn`, so hosts can pick patterns by name.
///
/// ## Rust Lesson #28: Generic Core, Dynamic Edge
///
/// `StringArt<P>` is generic and fully monomorphized per pattern. Hosts that
/// choose a pattern at runtime (a CLI argument, a saved file) cannot name `P`,
/// so they hold a `Box<dyn Artwork>` instead. One blanket impl bridges the two.
pub trait Artwork {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;

    /// Full control tree, common controls included.
    fn controls(&self) -> &[ControlConfig];
    fn config(&self) -> &Config;
    fn default_config(&self) -> &Config;

    /// Replace the whole config; keys not in `config` return to defaults.
    fn set_config(&mut self, config: &Config) -> Result<(), PatternError>;
    /// Merge `partial` into the current config.
    fn assign_config(&mut self, partial: &Config) -> Result<(), PatternError>;
    fn set_config_value(&mut self, key: &str, value: ConfigValue) -> Result<(), PatternError>;

    fn step_count(&self) -> usize;
    fn nail_count(&self) -> usize;
    fn aspect_ratio(&self) -> f64;

    /// Steps drawn so far.
    fn position(&self) -> usize;
    fn state(&self) -> DrawState;

    /// Fresh draw. Any live sequence is dropped first.
    fn draw(&mut self, renderer: &mut dyn Renderer, options: DrawOptions) -> Result<DrawOutcome, PatternError>;
    /// Seek to `position`: forward resumes, backward redraws.
    fn goto(&mut self, renderer: &mut dyn Renderer, position: usize) -> Result<DrawOutcome, PatternError>;
    /// Advance at most `max_steps`, starting a draw if none is live.
    fn draw_batch(
        &mut self,
        renderer: &mut dyn Renderer,
        max_steps: usize,
        abort: Option<&AbortSignal>,
    ) -> Result<DrawOutcome, PatternError>;

    /// Nail numbers of the last string drawn.
    fn last_string_nail_numbers(&self) -> Option<(usize, usize)>;
    fn layers(&self) -> &[Layer];

    fn serialize_config(&self) -> String;
    fn load_serialized(&mut self, serialized: &str) -> Result<(), PatternError>;
    /// `?pattern=<id>&config=<serialized>`.
    fn share_url(&self) -> String {
        pattern_url(self.id(), &self.serialize_config())
    }

    fn on_event(&mut self, listener: EventListener);
}

impl<P: PatternDefinition> Artwork for StringArt<P> {
    fn id(&self) -> &'static str {
        self.pattern.id()
    }

    fn name(&self) -> &'static str {
        self.pattern.name()
    }

    fn controls(&self) -> &[ControlConfig] {
        &self.controls
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn default_config(&self) -> &Config {
        &self.defaults
    }

    fn set_config(&mut self, config: &Config) -> Result<(), PatternError> {
        self.check_partial(config)?;
        let next = Config::merged(&self.defaults, config);
        self.replace_config(next);
        Ok(())
    }

    fn assign_config(&mut self, partial: &Config) -> Result<(), PatternError> {
        self.assign(partial)
    }

    fn set_config_value(&mut self, key: &str, value: ConfigValue) -> Result<(), PatternError> {
        self.assign(&Config::new().with(key, value))
    }

    fn step_count(&self) -> usize {
        self.pattern.get_step_count(&self.resolved_config())
    }

    fn nail_count(&self) -> usize {
        self.pattern.get_nail_count(&self.resolved_config())
    }

    fn aspect_ratio(&self) -> f64 {
        self.pattern.get_aspect_ratio(&self.resolved_config())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn state(&self) -> DrawState {
        self.state
    }

    fn draw(&mut self, renderer: &mut dyn Renderer, options: DrawOptions) -> Result<DrawOutcome, PatternError> {
        self.strings = None;
        self.init_draw(renderer, options.redraw_nails)?;
        self.advance(renderer, options.position, options.abort.as_ref())
    }

    fn goto(&mut self, renderer: &mut dyn Renderer, position: usize) -> Result<DrawOutcome, PatternError> {
        if self.state == DrawState::Done && position >= self.position {
            return Ok(DrawOutcome::Complete { position: self.position });
        }
        if self.strings.is_some() && position >= self.position {
            return self.advance(renderer, Some(position), None);
        }
        log::debug!("seeking back from {} to {}, redrawing", self.position, position);
        self.draw(renderer, DrawOptions::to_position(position).with_redraw_nails(false))
    }

    fn draw_batch(
        &mut self,
        renderer: &mut dyn Renderer,
        max_steps: usize,
        abort: Option<&AbortSignal>,
    ) -> Result<DrawOutcome, PatternError> {
        if self.state == DrawState::Done {
            return Ok(DrawOutcome::Complete { position: self.position });
        }
        if self.strings.is_none() {
            self.init_draw(renderer, true)?;
        }
        let target = self.position + max_steps;
        self.advance(renderer, Some(target), abort)
    }

    fn last_string_nail_numbers(&self) -> Option<(usize, usize)> {
        self.pen.last_string()
    }

    fn layers(&self) -> &[Layer] {
        self.pen.layers()
    }

    fn serialize_config(&self) -> String {
        serialize_config(&self.controls, &self.config)
    }

    fn load_serialized(&mut self, serialized: &str) -> Result<(), PatternError> {
        let partial = deserialize_config(&self.controls, serialized)?;
        Artwork::set_config(self, &partial)
    }

    fn on_event(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }
}
