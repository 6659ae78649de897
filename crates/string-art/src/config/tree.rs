//! Operations over control trees.
//!
//! Trees are never mutated in place: every helper returns a new tree (or,
//! for [`insert_after`] with a missing key, the very same slice).

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use super::{Config, ConfigError, ConfigValue, ControlConfig};

/// Flat key -> control lookup.
pub type ControlsIndex<'a> = HashMap<&'a str, &'a ControlConfig>;

/// Leaf controls in declaration order (pre-order, groups recursed).
pub fn leaf_controls(controls: &[ControlConfig]) -> Vec<&ControlConfig> {
    fn walk<'a>(controls: &'a [ControlConfig], out: &mut Vec<&'a ControlConfig>) {
        for control in controls {
            if control.is_group() {
                walk(&control.children, out);
            } else {
                out.push(control);
            }
        }
    }
    let mut out = Vec::new();
    walk(controls, &mut out);
    out
}

/// Default config for a control tree.
///
/// Formula defaults are not evaluated here, so bounds and defaults that
/// depend on the canvas can be computed at render time. Their keys hold
/// [`ConfigValue::Null`] to keep the config total.
pub fn get_config_default_values(controls: &[ControlConfig]) -> Config {
    leaf_controls(controls)
        .into_iter()
        .map(|control| {
            let value = control.constant_default().cloned().unwrap_or(ConfigValue::Null);
            (control.key.clone(), value)
        })
        .collect()
}

/// Every control (groups included) by key.
pub fn get_controls_index(controls: &[ControlConfig]) -> ControlsIndex<'_> {
    fn walk<'a>(controls: &'a [ControlConfig], index: &mut ControlsIndex<'a>) {
        for control in controls {
            index.insert(control.key.as_str(), control);
            walk(&control.children, index);
        }
    }
    let mut index = HashMap::new();
    walk(controls, &mut index);
    index
}

/// Reject trees where a key appears more than once.
pub fn validate_controls(controls: &[ControlConfig]) -> Result<(), ConfigError> {
    fn walk<'a>(controls: &'a [ControlConfig], seen: &mut HashSet<&'a str>) -> Result<(), ConfigError> {
        for control in controls {
            if !seen.insert(control.key.as_str()) {
                return Err(ConfigError::DuplicateKey(control.key.clone()));
            }
            walk(&control.children, seen)?;
        }
        Ok(())
    }
    walk(controls, &mut HashSet::new())
}

/// Insert `inserted` right after the control named `key`, at whatever depth
/// it lives.
///
/// A missing key is not an error: the input slice comes back untouched as
/// `Cow::Borrowed`, so optional patches can be applied blindly.
pub fn insert_after<'a>(
    controls: &'a [ControlConfig],
    key: &str,
    inserted: &[ControlConfig],
) -> Cow<'a, [ControlConfig]> {
    fn insert(controls: &[ControlConfig], key: &str, inserted: &[ControlConfig]) -> Option<Vec<ControlConfig>> {
        for (i, control) in controls.iter().enumerate() {
            if control.key == key {
                let mut result = Vec::with_capacity(controls.len() + inserted.len());
                result.extend_from_slice(&controls[..=i]);
                result.extend_from_slice(inserted);
                result.extend_from_slice(&controls[i + 1..]);
                return Some(result);
            }
            if let Some(children) = insert(&control.children, key, inserted) {
                let mut result = controls.to_vec();
                result[i].children = children;
                return Some(result);
            }
        }
        None
    }

    match insert(controls, key, inserted) {
        Some(result) => Cow::Owned(result),
        None => Cow::Borrowed(controls),
    }
}

/// Rebuild a tree, passing every control through `f`.
///
/// `f` sees each control before its children are mapped; the children of
/// whatever `f` returns are then mapped in turn.
pub fn map_controls<F>(controls: &[ControlConfig], f: &mut F) -> Vec<ControlConfig>
where
    F: FnMut(&ControlConfig) -> ControlConfig,
{
    controls
        .iter()
        .map(|control| {
            let mut mapped = f(control);
            let children = std::mem::take(&mut mapped.children);
            mapped.children = map_controls(&children, f);
            mapped
        })
        .collect()
}

/// Duplicate a control subtree under prefixed keys.
///
/// Predicates and formulas that reference keys inside the copied subtree are
/// rewritten to the new keys; references to keys outside it are kept.
pub fn copy_config(controls: &[ControlConfig], prefix: &str) -> Vec<ControlConfig> {
    let own_keys: HashSet<String> = get_controls_index(controls)
        .keys()
        .map(|k| k.to_string())
        .collect();
    let rename = |key: &str| {
        if own_keys.contains(key) {
            format!("{}{}", prefix, key)
        } else {
            key.to_string()
        }
    };

    map_controls(controls, &mut |control| {
        let mut copy = control.clone();
        copy.key = rename(&control.key);
        copy.show = control.show.as_ref().map(|p| p.rename_keys(&rename));
        copy.is_disabled = control.is_disabled.as_ref().map(|p| p.rename_keys(&rename));
        copy.attr.min = control.attr.min.as_ref().map(|f| f.rename_keys(&rename));
        copy.attr.max = control.attr.max.as_ref().map(|f| f.rename_keys(&rename));
        copy.attr.step = control.attr.step.as_ref().map(|f| f.rename_keys(&rename));
        if let super::DefaultValue::Formula(formula) = &control.default_value {
            copy.default_value = super::DefaultValue::Formula(formula.rename_keys(&rename));
        }
        copy
    })
}
