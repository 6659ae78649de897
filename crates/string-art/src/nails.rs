//! Nail registry.
//!
//! Patterns refer to nails by logical [`NailKey`]s. The registry maps keys to
//! coordinates and hands every distinct physical position a sequential nail
//! *number*, which is what a person threading the piece by hand counts.
//!
//! Two keys landing on the same spot (say, the shared center of a star, or an
//! inner polygon vertex sitting on an outer nail) alias one physical nail:
//! both resolve to the same point and number, and the nail is drawn once.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{BoundingRect, Point};
use crate::renderer::Renderer;

/// Positions closer than this (in canvas units) are the same nail.
const POSITION_PRECISION: f64 = 1e-6;

/// Logical nail reference, unique within one pattern instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NailKey {
    Number(usize),
    Name(String),
}

impl From<usize> for NailKey {
    fn from(value: usize) -> Self {
        NailKey::Number(value)
    }
}

impl From<&str> for NailKey {
    fn from(value: &str) -> Self {
        NailKey::Name(value.to_string())
    }
}

impl From<String> for NailKey {
    fn from(value: String) -> Self {
        NailKey::Name(value)
    }
}

impl fmt::Display for NailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NailKey::Number(n) => write!(f, "{}", n),
            NailKey::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NailError {
    #[error("unknown nail: {0}")]
    UnknownNail(NailKey),
    #[error("string drawn to nail {0} before the pen was placed")]
    PenNotPlaced(NailKey),
}

/// How a group of nails is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NailsGroupOptions {
    pub radius: f64,
    /// `None` leaves the color to the renderer.
    pub color: Option<String>,
    pub show_numbers: bool,
    pub font_size: f64,
}

impl Default for NailsGroupOptions {
    fn default() -> Self {
        Self {
            radius: 1.5,
            color: None,
            show_numbers: false,
            font_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nail {
    pub key: NailKey,
    pub point: Point,
}

/// A named batch of nails sharing render options, e.g. a backdrop circle.
#[derive(Debug, Clone, PartialEq)]
pub struct NailsGroup {
    pub key: String,
    pub nails: Vec<Nail>,
    pub options: NailsGroupOptions,
}

impl NailsGroup {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nails: Vec::new(),
            options: NailsGroupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NailsGroupOptions) -> Self {
        self.options = options;
        self
    }
}

/// Sink that shapes and patterns register nails into.
pub trait NailsSetter {
    fn add_nail(&mut self, key: NailKey, point: Point);
    fn add_group(&mut self, group: NailsGroup);
}

impl NailsSetter for NailsGroup {
    fn add_nail(&mut self, key: NailKey, point: Point) {
        self.nails.push(Nail { key, point });
    }

    /// Nested groups are flattened into this one.
    fn add_group(&mut self, group: NailsGroup) {
        self.nails.extend(group.nails);
    }
}

/// A physical nail as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberedNail {
    pub number: usize,
    pub point: Point,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    key: String,
    options: NailsGroupOptions,
    numbers: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Resolved {
    number: usize,
    point: Point,
}

/// The registry for one structure generation of a pattern.
#[derive(Debug, Clone)]
pub struct Nails {
    keys: HashMap<NailKey, Resolved>,
    positions: HashMap<(i64, i64), usize>,
    points: Vec<Point>,
    groups: Vec<GroupEntry>,
}

impl Nails {
    pub const DEFAULT_GROUP: &'static str = "default";

    pub fn new(default_options: NailsGroupOptions) -> Self {
        Self {
            keys: HashMap::new(),
            positions: HashMap::new(),
            points: Vec::new(),
            groups: vec![GroupEntry {
                key: Self::DEFAULT_GROUP.to_string(),
                options: default_options,
                numbers: Vec::new(),
            }],
        }
    }

    /// Replace the default group's options (nail radius, color, numbering).
    pub fn set_default_options(&mut self, options: NailsGroupOptions) {
        self.groups[0].options = options;
    }

    fn quantize(point: Point) -> (i64, i64) {
        (
            (point.x / POSITION_PRECISION).round() as i64,
            (point.y / POSITION_PRECISION).round() as i64,
        )
    }

    fn register(&mut self, key: NailKey, point: Point, group: usize) {
        if let Some(existing) = self.keys.get(&key) {
            if Self::quantize(existing.point) != Self::quantize(point) {
                log::warn!(
                    "nail {} registered twice at different positions, keeping the first",
                    key
                );
            }
            return;
        }

        let cell = Self::quantize(point);
        let number = match self.positions.get(&cell) {
            Some(&number) => number,
            None => {
                let number = self.points.len();
                self.points.push(point);
                self.positions.insert(cell, number);
                self.groups[group].numbers.push(number);
                number
            }
        };
        self.keys.insert(key, Resolved { number, point: self.points[number] });
    }

    pub fn resolve(&self, key: &NailKey) -> Result<Point, NailError> {
        self.keys
            .get(key)
            .map(|r| r.point)
            .ok_or_else(|| NailError::UnknownNail(key.clone()))
    }

    /// The physical nail number behind a key.
    pub fn number_of(&self, key: &NailKey) -> Result<usize, NailError> {
        self.keys
            .get(key)
            .map(|r| r.number)
            .ok_or_else(|| NailError::UnknownNail(key.clone()))
    }

    /// Number of registered keys (aliases included).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of distinct physical nails.
    pub fn unique_count(&self) -> usize {
        self.points.len()
    }

    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(self.points.iter().copied())
    }

    /// Groups in registration order, the default group first.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &NailsGroupOptions, Vec<NumberedNail>)> {
        self.groups.iter().map(|group| {
            let nails = group
                .numbers
                .iter()
                .map(|&number| NumberedNail { number, point: self.points[number] })
                .collect();
            (group.key.as_str(), &group.options, nails)
        })
    }

    /// Send every non-empty group to the renderer, once each.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for (key, options, nails) in self.groups() {
            if !nails.is_empty() {
                renderer.render_nails_group(key, &nails, options);
            }
        }
    }
}

impl Default for Nails {
    fn default() -> Self {
        Self::new(NailsGroupOptions::default())
    }
}

impl NailsSetter for Nails {
    fn add_nail(&mut self, key: NailKey, point: Point) {
        self.register(key, point, 0);
    }

    /// Groups with an existing key are merged into it.
    fn add_group(&mut self, group: NailsGroup) {
        let index = match self.groups.iter().position(|g| g.key == group.key) {
            Some(index) => index,
            None => {
                self.groups.push(GroupEntry {
                    key: group.key,
                    options: group.options,
                    numbers: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        for nail in group.nails {
            self.register(nail.key, nail.point, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RecordingRenderer, RenderCommand};
    use crate::geometry::Dimensions;

    #[test]
    fn numbers_follow_registration_order() {
        let mut nails = Nails::default();
        nails.add_nail(NailKey::Number(5), Point::new(1.0, 1.0));
        nails.add_nail(NailKey::from("a"), Point::new(2.0, 2.0));
        nails.add_nail(NailKey::Number(0), Point::new(3.0, 3.0));

        assert_eq!(nails.number_of(&NailKey::Number(5)), Ok(0));
        assert_eq!(nails.number_of(&NailKey::from("a")), Ok(1));
        assert_eq!(nails.number_of(&NailKey::Number(0)), Ok(2));
        assert_eq!(nails.resolve(&NailKey::from("a")), Ok(Point::new(2.0, 2.0)));
    }

    #[test]
    fn coincident_nails_alias() {
        let mut nails = Nails::default();
        nails.add_nail(NailKey::Number(0), Point::new(10.0, 10.0));
        nails.add_nail(NailKey::Number(1), Point::new(20.0, 10.0));
        nails.add_nail(NailKey::Number(2), Point::new(10.0 + 1e-9, 10.0));

        assert_eq!(nails.len(), 3);
        assert_eq!(nails.unique_count(), 2);
        assert_eq!(nails.number_of(&NailKey::Number(2)), Ok(0));
        assert_eq!(nails.resolve(&NailKey::Number(2)), Ok(Point::new(10.0, 10.0)));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let nails = Nails::default();
        assert_eq!(
            nails.resolve(&NailKey::Number(3)),
            Err(NailError::UnknownNail(NailKey::Number(3)))
        );
    }

    #[test]
    fn groups_render_once_each() {
        let mut nails = Nails::default();
        nails.add_nail(NailKey::Number(0), Point::new(0.0, 0.0));

        let mut backdrop = NailsGroup::new("backdrop");
        backdrop.add_nail(NailKey::from("b0"), Point::new(5.0, 5.0));
        backdrop.add_nail(NailKey::from("b1"), Point::new(0.0, 0.0));
        nails.add_group(backdrop);

        let mut more = NailsGroup::new("backdrop");
        more.add_nail(NailKey::from("b2"), Point::new(6.0, 6.0));
        nails.add_group(more);

        let mut renderer = RecordingRenderer::new(Dimensions::square(100.0));
        nails.render(&mut renderer);

        let groups: Vec<(String, usize)> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::NailsGroup { group, nails } => Some((group.clone(), nails.len())),
                _ => None,
            })
            .collect();
        // "b1" aliases nail 0, which belongs to the default group.
        assert_eq!(groups, vec![("default".to_string(), 1), ("backdrop".to_string(), 2)]);
    }
}
