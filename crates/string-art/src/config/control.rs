//! Control definitions: what a parameter is, how it is shown, and how its
//! bounds and default depend on other parameters.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError, ConfigValue};

/// Kind of input a control represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Range,
    Checkbox,
    Color,
    Group,
    Select,
    Number,
    Text,
}

impl ControlType {
    pub fn name(&self) -> &'static str {
        match self {
            ControlType::Range => "range",
            ControlType::Checkbox => "checkbox",
            ControlType::Color => "color",
            ControlType::Group => "group",
            ControlType::Select => "select",
            ControlType::Number => "number",
            ControlType::Text => "text",
        }
    }
}

/// A boolean condition over config values.
///
/// Replaces arbitrary `show`/`isDisabled` closures: each variant names the
/// keys it reads, so dependencies can be listed and renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The key's value is truthy.
    Flag(String),
    Not(Box<Predicate>),
    Equals(String, ConfigValue),
    GreaterThan(String, f64),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn flag(key: &str) -> Self {
        Predicate::Flag(key.to_string())
    }

    pub fn not_flag(key: &str) -> Self {
        Predicate::Not(Box::new(Predicate::flag(key)))
    }

    pub fn equals(key: &str, value: impl Into<ConfigValue>) -> Self {
        Predicate::Equals(key.to_string(), value.into())
    }

    pub fn eval(&self, config: &Config) -> bool {
        match self {
            Predicate::Flag(key) => config.flag(key),
            Predicate::Not(inner) => !inner.eval(config),
            Predicate::Equals(key, value) => config.get(key) == Some(value),
            Predicate::GreaterThan(key, threshold) => config
                .get(key)
                .and_then(ConfigValue::as_number)
                .is_some_and(|n| n > *threshold),
            Predicate::All(items) => items.iter().all(|p| p.eval(config)),
            Predicate::Any(items) => items.iter().any(|p| p.eval(config)),
        }
    }

    /// Config keys this predicate reads.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            Predicate::Flag(key) | Predicate::Equals(key, _) | Predicate::GreaterThan(key, _) => {
                keys.push(key)
            }
            Predicate::Not(inner) => inner.collect_keys(keys),
            Predicate::All(items) | Predicate::Any(items) => {
                items.iter().for_each(|p| p.collect_keys(keys))
            }
        }
    }

    pub(crate) fn rename_keys(&self, rename: &dyn Fn(&str) -> String) -> Predicate {
        match self {
            Predicate::Flag(key) => Predicate::Flag(rename(key)),
            Predicate::Not(inner) => Predicate::Not(Box::new(inner.rename_keys(rename))),
            Predicate::Equals(key, value) => Predicate::Equals(rename(key), value.clone()),
            Predicate::GreaterThan(key, t) => Predicate::GreaterThan(rename(key), *t),
            Predicate::All(items) => {
                Predicate::All(items.iter().map(|p| p.rename_keys(rename)).collect())
            }
            Predicate::Any(items) => {
                Predicate::Any(items.iter().map(|p| p.rename_keys(rename)).collect())
            }
        }
    }
}

/// A numeric expression over config values.
///
/// Used for derived bounds (e.g. `max = n - 1`) and derived defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Const(f64),
    Key(String),
    Add(Box<Formula>, Box<Formula>),
    Sub(Box<Formula>, Box<Formula>),
    Mul(Box<Formula>, Box<Formula>),
    Div(Box<Formula>, Box<Formula>),
    Min(Box<Formula>, Box<Formula>),
    Max(Box<Formula>, Box<Formula>),
    Floor(Box<Formula>),
}

impl From<f64> for Formula {
    fn from(value: f64) -> Self {
        Formula::Const(value)
    }
}

impl From<i32> for Formula {
    fn from(value: i32) -> Self {
        Formula::Const(value as f64)
    }
}

impl Formula {
    pub fn key(key: &str) -> Self {
        Formula::Key(key.to_string())
    }

    pub fn plus(self, other: impl Into<Formula>) -> Self {
        Formula::Add(Box::new(self), Box::new(other.into()))
    }

    pub fn minus(self, other: impl Into<Formula>) -> Self {
        Formula::Sub(Box::new(self), Box::new(other.into()))
    }

    pub fn times(self, other: impl Into<Formula>) -> Self {
        Formula::Mul(Box::new(self), Box::new(other.into()))
    }

    pub fn divided_by(self, other: impl Into<Formula>) -> Self {
        Formula::Div(Box::new(self), Box::new(other.into()))
    }

    pub fn at_most(self, other: impl Into<Formula>) -> Self {
        Formula::Min(Box::new(self), Box::new(other.into()))
    }

    pub fn at_least(self, other: impl Into<Formula>) -> Self {
        Formula::Max(Box::new(self), Box::new(other.into()))
    }

    pub fn floor(self) -> Self {
        Formula::Floor(Box::new(self))
    }

    /// Evaluate against a config. Division by zero yields 0.
    pub fn eval(&self, config: &Config) -> f64 {
        match self {
            Formula::Const(n) => *n,
            Formula::Key(key) => config.number(key),
            Formula::Add(a, b) => a.eval(config) + b.eval(config),
            Formula::Sub(a, b) => a.eval(config) - b.eval(config),
            Formula::Mul(a, b) => a.eval(config) * b.eval(config),
            Formula::Div(a, b) => {
                let denominator = b.eval(config);
                if denominator == 0.0 {
                    0.0
                } else {
                    a.eval(config) / denominator
                }
            }
            Formula::Min(a, b) => a.eval(config).min(b.eval(config)),
            Formula::Max(a, b) => a.eval(config).max(b.eval(config)),
            Formula::Floor(a) => a.eval(config).floor(),
        }
    }

    pub fn dependencies(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            Formula::Const(_) => {}
            Formula::Key(key) => keys.push(key),
            Formula::Add(a, b)
            | Formula::Sub(a, b)
            | Formula::Mul(a, b)
            | Formula::Div(a, b)
            | Formula::Min(a, b)
            | Formula::Max(a, b) => {
                a.collect_keys(keys);
                b.collect_keys(keys);
            }
            Formula::Floor(a) => a.collect_keys(keys),
        }
    }

    pub(crate) fn rename_keys(&self, rename: &dyn Fn(&str) -> String) -> Formula {
        let pair = |a: &Formula, b: &Formula| {
            (Box::new(a.rename_keys(rename)), Box::new(b.rename_keys(rename)))
        };
        match self {
            Formula::Const(n) => Formula::Const(*n),
            Formula::Key(key) => Formula::Key(rename(key)),
            Formula::Add(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Add(a, b)
            }
            Formula::Sub(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Sub(a, b)
            }
            Formula::Mul(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Mul(a, b)
            }
            Formula::Div(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Div(a, b)
            }
            Formula::Min(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Min(a, b)
            }
            Formula::Max(a, b) => {
                let (a, b) = pair(a, b);
                Formula::Max(a, b)
            }
            Formula::Floor(a) => Formula::Floor(Box::new(a.rename_keys(rename))),
        }
    }
}

/// Default of a control: a constant, or a formula over the rest of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Constant(ConfigValue),
    Formula(Formula),
}

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: ConfigValue,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<ConfigValue>, label: &str) -> Self {
        Self { value: value.into(), label: label.to_string() }
    }
}

/// Input bounds. Each bound may depend on other config values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlAttr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Formula>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Formula>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Formula>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// Bounds evaluated against a concrete config.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedAttr {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

/// A single parameter (or a group of parameters) of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub control_type: ControlType,
    pub default_value: DefaultValue,
    #[serde(default)]
    pub attr: ControlAttr,
    /// Changing this control invalidates derived geometry and nails.
    #[serde(default)]
    pub is_structural: bool,
    /// Changing this control changes the number of steps.
    #[serde(default)]
    pub affects_step_count: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ControlConfig>,
}

impl ControlConfig {
    fn leaf(key: &str, label: &str, control_type: ControlType, default: ConfigValue) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            control_type,
            default_value: DefaultValue::Constant(default),
            attr: ControlAttr::default(),
            is_structural: false,
            affects_step_count: false,
            show: None,
            is_disabled: None,
            children: Vec::new(),
        }
    }

    /// A slider with `min`/`max`/`step` bounds.
    pub fn range(key: &str, label: &str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self::leaf(key, label, ControlType::Range, default.into())
            .with_min(min)
            .with_max(max)
            .with_step(step)
    }

    pub fn number(key: &str, label: &str, default: f64) -> Self {
        Self::leaf(key, label, ControlType::Number, default.into())
    }

    pub fn checkbox(key: &str, label: &str, default: bool) -> Self {
        Self::leaf(key, label, ControlType::Checkbox, default.into())
    }

    pub fn color(key: &str, label: &str, default: &str) -> Self {
        Self::leaf(key, label, ControlType::Color, default.into())
    }

    pub fn text(key: &str, label: &str, default: &str) -> Self {
        Self::leaf(key, label, ControlType::Text, default.into())
    }

    pub fn select(
        key: &str,
        label: &str,
        default: impl Into<ConfigValue>,
        options: Vec<SelectOption>,
    ) -> Self {
        let mut control = Self::leaf(key, label, ControlType::Select, default.into());
        control.attr.options = options;
        control
    }

    pub fn group(key: &str, label: &str, children: Vec<ControlConfig>) -> Self {
        let mut control = Self::leaf(key, label, ControlType::Group, ConfigValue::Null);
        control.children = children;
        control
    }

    pub fn with_min(mut self, min: impl Into<Formula>) -> Self {
        self.attr.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Formula>) -> Self {
        self.attr.max = Some(max.into());
        self
    }

    pub fn with_step(mut self, step: impl Into<Formula>) -> Self {
        self.attr.step = Some(step.into());
        self
    }

    /// Derive the default from other values. Not evaluated into default configs.
    pub fn with_default_formula(mut self, formula: Formula) -> Self {
        self.default_value = DefaultValue::Formula(formula);
        self
    }

    /// Mark as structural. Structural controls also affect the step count.
    pub fn structural(mut self) -> Self {
        self.is_structural = true;
        self.affects_step_count = true;
        self
    }

    pub fn affects_step_count(mut self) -> Self {
        self.affects_step_count = true;
        self
    }

    pub fn with_show(mut self, show: Predicate) -> Self {
        self.show = Some(show);
        self
    }

    pub fn with_disabled(mut self, is_disabled: Predicate) -> Self {
        self.is_disabled = Some(is_disabled);
        self
    }

    pub fn is_group(&self) -> bool {
        self.control_type == ControlType::Group
    }

    /// The constant default, if the default is not derived.
    pub fn constant_default(&self) -> Option<&ConfigValue> {
        match &self.default_value {
            DefaultValue::Constant(value) => Some(value),
            DefaultValue::Formula(_) => None,
        }
    }

    /// The default, evaluating a formula default against `config`.
    pub fn resolve_default(&self, config: &Config) -> ConfigValue {
        match &self.default_value {
            DefaultValue::Constant(value) => value.clone(),
            DefaultValue::Formula(formula) => ConfigValue::Number(formula.eval(config)),
        }
    }

    pub fn is_visible(&self, config: &Config) -> bool {
        self.show.as_ref().is_none_or(|p| p.eval(config))
    }

    pub fn is_disabled(&self, config: &Config) -> bool {
        self.is_disabled.as_ref().is_some_and(|p| p.eval(config))
    }

    pub fn resolve_attr(&self, config: &Config) -> ResolvedAttr {
        ResolvedAttr {
            min: self.attr.min.as_ref().map(|f| f.eval(config)),
            max: self.attr.max.as_ref().map(|f| f.eval(config)),
            step: self.attr.step.as_ref().map(|f| f.eval(config)),
        }
    }

    /// Check that `value` fits this control's type.
    ///
    /// Bounds are not enforced: they may depend on values set later in the
    /// same update.
    pub fn validate_value(&self, value: &ConfigValue) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue { key: self.key.clone(), reason };
        match (self.control_type, value) {
            (ControlType::Group, _) => Err(invalid("groups hold no value".to_string())),
            (_, ConfigValue::Null) if matches!(self.default_value, DefaultValue::Formula(_)) => {
                Ok(())
            }
            (ControlType::Checkbox, ConfigValue::Bool(_)) => Ok(()),
            (ControlType::Range | ControlType::Number, ConfigValue::Number(n)) => {
                if n.is_finite() {
                    Ok(())
                } else {
                    Err(invalid(format!("{} is not finite", n)))
                }
            }
            (ControlType::Color, ConfigValue::Text(color)) => color
                .parse::<svgtypes::Color>()
                .map(|_| ())
                .map_err(|e| invalid(format!("{:?} is not a color: {}", color, e))),
            (ControlType::Text, ConfigValue::Text(_)) => Ok(()),
            (ControlType::Select, value) => {
                if self.attr.options.is_empty() || self.attr.options.iter().any(|o| &o.value == value)
                {
                    Ok(())
                } else {
                    Err(invalid(format!("{} is not one of the options", value)))
                }
            }
            (control_type, value) => Err(invalid(format!(
                "{} control cannot hold {:?}",
                control_type.name(),
                value
            ))),
        }
    }
}
