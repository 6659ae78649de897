//! The bundled string-art patterns.
//!
//! Each pattern is a [`PatternDefinition`]; [`Pattern`] lists them so hosts
//! can pick one by name and get a ready engine back as a `Box<dyn Artwork>`.

pub mod util;

mod circle;
mod comet;
mod lotus;
mod maurer_rose;
mod parabola;
mod polygon;
mod star;

pub use circle::TimesTables;
pub use comet::Comet;
pub use lotus::{Lotus, LotusLayers};
pub use maurer_rose::{MaurerRose, RoseWalk};
pub use parabola::{Arms, Parabola};
pub use polygon::{Polygon, CENTER_GROUP};
pub use star::Star;

use crate::config::{parse_url, Config};
use crate::engine::{Artwork, PatternDefinition, PatternError, StringArt};

/// Metadata describing a pattern for listings.
#[derive(Debug, Clone, Copy)]
pub struct PatternMetadata {
    /// Display name
    pub label: &'static str,
    /// Brief description of the pattern
    pub description: &'static str,
}

impl PatternMetadata {
    pub const fn new(label: &'static str, description: &'static str) -> Self {
        Self { label, description }
    }
}

/// Available pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Circle,
    Star,
    Polygon,
    Lotus,
    MaurerRose,
    Comet,
    Parabola,
}

fn boxed<P: PatternDefinition + 'static>(pattern: P) -> Result<Box<dyn Artwork>, PatternError> {
    Ok(Box::new(StringArt::new(pattern)?))
}

impl Pattern {
    pub fn all() -> &'static [Pattern] {
        &[
            Pattern::Circle,
            Pattern::Star,
            Pattern::Polygon,
            Pattern::Lotus,
            Pattern::MaurerRose,
            Pattern::Comet,
            Pattern::Parabola,
        ]
    }

    /// Stable id, as used in share links.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Circle => "circle",
            Pattern::Star => "star",
            Pattern::Polygon => "polygon",
            Pattern::Lotus => "lotus",
            Pattern::MaurerRose => "maurer_rose",
            Pattern::Comet => "comet",
            Pattern::Parabola => "parabola",
        }
    }

    pub fn metadata(&self) -> PatternMetadata {
        match self {
            Pattern::Circle => PatternMetadata::new("Times Tables", "Modular multiplication on a circle"),
            Pattern::Star => PatternMetadata::new("Star", "Curves stitched between star arms"),
            Pattern::Polygon => PatternMetadata::new("Polygon", "Corner curves on a regular polygon"),
            Pattern::Lotus => PatternMetadata::new("Lotus", "Nested, rotated polygons"),
            Pattern::MaurerRose => PatternMetadata::new("Maurer Rose", "Closed walk over a rose curve"),
            Pattern::Comet => PatternMetadata::new("Comet", "Fixed-jump chords on an eased circle"),
            Pattern::Parabola => PatternMetadata::new("Parabola", "Envelope between two lines"),
        }
    }

    /// A fresh engine for this pattern, with default config.
    pub fn create(&self) -> Result<Box<dyn Artwork>, PatternError> {
        match self {
            Pattern::Circle => boxed(TimesTables),
            Pattern::Star => boxed(Star),
            Pattern::Polygon => boxed(Polygon),
            Pattern::Lotus => boxed(Lotus),
            Pattern::MaurerRose => boxed(MaurerRose),
            Pattern::Comet => boxed(Comet),
            Pattern::Parabola => boxed(Parabola),
        }
    }

    /// An engine with `partial` merged over the defaults.
    pub fn create_with(&self, partial: &Config) -> Result<Box<dyn Artwork>, PatternError> {
        let mut art = self.create()?;
        art.assign_config(partial)?;
        Ok(art)
    }

    /// An engine restored from a serialized config string.
    pub fn restore(&self, serialized: &str) -> Result<Box<dyn Artwork>, PatternError> {
        let mut art = self.create()?;
        art.load_serialized(serialized)?;
        Ok(art)
    }

    /// Parse pattern from string.
    pub fn from_name(name: &str) -> Option<Pattern> {
        match name.to_lowercase().as_str() {
            "circle" | "times_tables" | "times-tables" => Some(Pattern::Circle),
            "star" => Some(Pattern::Star),
            "polygon" => Some(Pattern::Polygon),
            "lotus" => Some(Pattern::Lotus),
            "maurer_rose" | "maurer-rose" | "maurer" => Some(Pattern::MaurerRose),
            "comet" => Some(Pattern::Comet),
            "parabola" | "curve" => Some(Pattern::Parabola),
            _ => None,
        }
    }
}

/// Restore an engine from a `?pattern=<id>&config=<serialized>` link.
pub fn from_url(url: &str) -> Result<Box<dyn Artwork>, PatternError> {
    let link = parse_url(url).ok_or_else(|| PatternError::UnknownPattern(url.to_string()))?;
    let pattern = Pattern::from_name(&link.pattern).ok_or(PatternError::UnknownPattern(link.pattern))?;
    pattern.restore(&link.config)
}
