//! Threading steps.
//!
//! A pattern describes its strings as a lazy sequence of [`Step`]s. Each step
//! pulls exactly one string, so counting steps counts rendered lines.
//!
//! ## Rust Lesson #25: Iterators Instead of Generators
//!
//! Rust has no stable generators, but an `Iterator` that owns its state
//! (indices plus an `Arc` of the shared geometry) is just as lazy and can be
//! paused and resumed at will: the engine simply stops calling `next()`.

use crate::nails::NailKey;

/// Begin a new color layer before the step's string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerStart {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl LayerStart {
    pub fn color(color: impl Into<String>) -> Self {
        Self { name: None, color: Some(color.into()) }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub layer: Option<LayerStart>,
    /// Move the pen here first, without drawing.
    pub from: Option<NailKey>,
    pub to: NailKey,
}

impl Step {
    /// Continue the thread from wherever the pen is.
    pub fn to(key: impl Into<NailKey>) -> Self {
        Self { layer: None, from: None, to: key.into() }
    }

    /// Lift the pen to `from`, then pull a string to `to`.
    pub fn line(from: impl Into<NailKey>, to: impl Into<NailKey>) -> Self {
        Self { layer: None, from: Some(from.into()), to: to.into() }
    }

    pub fn with_layer(mut self, layer: LayerStart) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// The boxed step sequence every pattern hands to the engine.
pub type Steps = Box<dyn Iterator<Item = Step>>;
