//! # string-art
//!
//! Pattern engine for string art: nails placed by parametric shapes, and the
//! threading between them played back step by step.
//!
//! ## Rust Lesson #7: Modules
//!
//! The crate is split leaf-first:
//! - `geometry`, `config`: plain data and math, no dependencies on the rest
//! - `shapes`, `nails`, `steps`: where nails go and how strings are described
//! - `controller`, `renderer`: turning steps into drawing calls
//! - `engine`, `color`: the resumable drawing protocol and its palettes
//! - `patterns`, `instructions`, `store`: what hosts actually use
//!
//! `pub use` below re-exports the types most hosts need at the crate root.

pub mod color;
pub mod config;
pub mod controller;
pub mod engine;
pub mod geometry;
pub mod instructions;
pub mod nails;
pub mod patterns;
pub mod renderer;
pub mod shapes;
pub mod steps;
pub mod store;

// Re-export common types at crate root for convenience.
pub use color::{ColorConfig, ColorEngine, ColorMap};
pub use config::{Config, ConfigError, ConfigValue, ControlConfig};
pub use engine::{
    AbortSignal, Artwork, DrawEvent, DrawOptions, DrawOutcome, DrawState, PatternDefinition,
    PatternError, StringArt,
};
pub use geometry::{BoundingRect, Dimensions, Point};
pub use instructions::Instructions;
pub use nails::{NailError, NailKey, Nails, NailsGroup, NailsSetter};
pub use patterns::{Pattern, PatternMetadata};
pub use renderer::{RecordingRenderer, Renderer, SvgError, SvgRenderer};
pub use shapes::{Shape, ShapeError};
pub use steps::{LayerStart, Step, Steps};
pub use store::{PatternStore, SavedPattern, StoreError};
