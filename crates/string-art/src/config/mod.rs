//! Declarative pattern configuration.
//!
//! A pattern describes its parameters as a tree of [`ControlConfig`]s. The
//! values live in a flat [`Config`] that always holds every leaf key of the
//! tree: anything the user never touched resolves to the control's default.

mod control;
mod serialize;
mod tree;

pub use control::{
    ControlAttr, ControlConfig, ControlType, DefaultValue, Formula, Predicate, ResolvedAttr,
    SelectOption,
};
pub use serialize::{
    deserialize_config, parse_url, pattern_url, serialize_config, PatternLink,
};
pub use tree::{
    copy_config, get_config_default_values, get_controls_index, insert_after, leaf_controls,
    map_controls, validate_controls, ControlsIndex,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from config lookups, validation, and (de)serialization.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("duplicate control key: {0}")]
    DuplicateKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("malformed config string at field {index}: {token:?}")]
    Malformed { index: usize, token: String },
}

/// A single config value.
///
/// `Null` marks a value that is derived from other values at render time
/// (a control whose default is a [`Formula`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// JS-like truthiness, used by `Predicate::Flag`.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Null => false,
            ConfigValue::Bool(b) => *b,
            ConfigValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConfigValue::Text(s) => !s.is_empty(),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<usize> for ConfigValue {
    fn from(value: usize) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Flat key -> value mapping.
///
/// Engine-owned configs are total over their control tree. A `Config` is also
/// used as a *partial* update (only the keys being changed), see
/// [`Config::merged`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value, returning the previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `defaults` overlaid with every key of `partial`.
    pub fn merged(defaults: &Config, partial: &Config) -> Config {
        let mut merged = defaults.clone();
        for (key, value) in partial.iter() {
            merged.set(key, value.clone());
        }
        merged
    }

    /// Keys whose value differs between the two configs (either direction).
    pub fn changed_keys<'a>(&'a self, other: &'a Config) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .iter()
            .filter(|(k, v)| other.get(k) != Some(*v))
            .map(|(k, _)| k)
            .collect();
        keys.extend(other.keys().filter(|k| !self.contains_key(k)));
        keys
    }

    /// Only the entries that differ from `defaults`.
    pub fn without_defaults(&self, defaults: &Config) -> Config {
        let values = self
            .values
            .iter()
            .filter(|(k, v)| defaults.get(k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Config { values }
    }

    /// Numeric value; `0.0` (with a warning) for missing or non-numeric keys.
    pub fn number(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(ConfigValue::Number(n)) => *n,
            Some(ConfigValue::Bool(b)) => f64::from(u8::from(*b)),
            other => {
                log::warn!("config key {:?} is not a number ({:?})", key, other);
                0.0
            }
        }
    }

    /// Numeric value as a non-negative count.
    pub fn count(&self, key: &str) -> usize {
        let n = self.number(key).round();
        if n > 0.0 { n as usize } else { 0 }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(ConfigValue::is_truthy)
    }

    /// Text value; `""` for missing or non-text keys.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(ConfigValue::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for Config {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut config = Config::new();
        for (k, v) in iter {
            config.set(k, v);
        }
        config
    }
}
