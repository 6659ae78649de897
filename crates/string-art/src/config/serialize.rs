//! Compact config strings for share links.
//!
//! Non-default values are written in the control tree's leaf order, joined
//! by `_`. Defaults become empty fields, trailing ones are dropped, and runs
//! of three or more `_` collapse to `~N_`:
//!
//! ```text
//! sides=9 density=88               -> 9_88
//! sides=9 (4 defaults) reverse=on  -> 9~5_!1
//! ```

use super::{
    get_config_default_values, leaf_controls, Config, ConfigError, ConfigValue, ControlConfig,
    ControlType,
};
use crate::geometry::round_to;

const DELIMITER: char = '_';
const RUN_MARKER: char = '~';
const MIN_RUN: usize = 3;
const NUMBER_DECIMALS: i32 = 6;

/// Serialize the non-default values of `config`.
pub fn serialize_config(controls: &[ControlConfig], config: &Config) -> String {
    let defaults = get_config_default_values(controls);
    let mut fields: Vec<String> = leaf_controls(controls)
        .into_iter()
        .map(|control| match config.get(&control.key) {
            Some(value) if defaults.get(&control.key) != Some(value) => encode_value(control, value),
            _ => String::new(),
        })
        .collect();

    while fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }

    compress_delimiters(&fields.join("_"))
}

/// Parse a config string back into the partial config it came from.
///
/// Only keys that differ from their defaults are present in the result.
/// Extra trailing fields (from a newer or different pattern) are ignored.
pub fn deserialize_config(
    controls: &[ControlConfig],
    serialized: &str,
) -> Result<Config, ConfigError> {
    let mut config = Config::new();
    if serialized.is_empty() {
        return Ok(config);
    }

    let defaults = get_config_default_values(controls);
    let leaves = leaf_controls(controls);
    let expanded = expand_delimiters(serialized)?;

    for (index, field) in expanded.split(DELIMITER).enumerate() {
        let Some(control) = leaves.get(index) else {
            log::warn!(
                "config string has more fields than controls ({}), ignoring the rest",
                leaves.len()
            );
            break;
        };
        if field.is_empty() {
            continue;
        }
        let value = decode_value(control, field).ok_or_else(|| ConfigError::Malformed {
            index,
            token: field.to_string(),
        })?;
        if defaults.get(&control.key) != Some(&value) {
            config.set(control.key.clone(), value);
        }
    }

    Ok(config)
}

/// A pattern reference with its serialized config, as found in share links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLink {
    pub pattern: String,
    pub config: String,
}

/// Share-link query string: `?pattern=<id>&config=<serialized>`.
///
/// The config parameter is omitted when everything is at its default.
pub fn pattern_url(pattern_id: &str, serialized: &str) -> String {
    if serialized.is_empty() {
        format!("?pattern={}", pattern_id)
    } else {
        format!("?pattern={}&config={}", pattern_id, serialized)
    }
}

/// Parse a query string produced by [`pattern_url`]. The leading `?` is optional.
pub fn parse_url(query: &str) -> Option<PatternLink> {
    let query = query.rsplit_once('?').map_or(query, |(_, q)| q);
    let mut pattern = None;
    let mut config = String::new();
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("pattern", value)) if !value.is_empty() => pattern = Some(value.to_string()),
            Some(("config", value)) => config = value.to_string(),
            _ => {}
        }
    }
    pattern.map(|pattern| PatternLink { pattern, config })
}

// ============================================================================
// FIELD ENCODING
// ============================================================================

fn encode_value(control: &ControlConfig, value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => String::new(),
        ConfigValue::Bool(true) => "!1".to_string(),
        ConfigValue::Bool(false) => "!0".to_string(),
        ConfigValue::Number(n) => format_number(*n),
        ConfigValue::Text(text) => {
            let text = if control.control_type == ControlType::Color {
                text.strip_prefix('#').unwrap_or(text)
            } else {
                text
            };
            escape_text(text)
        }
    }
}

fn decode_value(control: &ControlConfig, field: &str) -> Option<ConfigValue> {
    match control.control_type {
        ControlType::Checkbox => match field {
            "!1" => Some(ConfigValue::Bool(true)),
            "!0" => Some(ConfigValue::Bool(false)),
            _ => None,
        },
        ControlType::Range | ControlType::Number => {
            field.parse::<f64>().ok().filter(|n| n.is_finite()).map(ConfigValue::Number)
        }
        ControlType::Color => {
            let text = unescape_text(field)?;
            // Named colors are stored as-is, hex colors lost their '#'.
            if text.chars().all(|c| c.is_ascii_hexdigit()) {
                Some(ConfigValue::Text(format!("#{}", text)))
            } else {
                Some(ConfigValue::Text(text))
            }
        }
        ControlType::Text => unescape_text(field).map(ConfigValue::Text),
        ControlType::Select => control
            .attr
            .options
            .iter()
            .find(|option| encode_value(control, &option.value) == field)
            .map(|option| option.value.clone())
            .or_else(|| match field {
                "!1" => Some(ConfigValue::Bool(true)),
                "!0" => Some(ConfigValue::Bool(false)),
                _ => match control.constant_default() {
                    Some(ConfigValue::Number(_)) => field.parse().ok().map(ConfigValue::Number),
                    _ => unescape_text(field).map(ConfigValue::Text),
                },
            }),
        ControlType::Group => None,
    }
}

/// Round to 6 decimals and print without trailing zeros.
fn format_number(n: f64) -> String {
    let rounded = round_to(n, NUMBER_DECIMALS);
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '_' => escaped.push_str("%5F"),
            '~' => escaped.push_str("%7E"),
            '&' => escaped.push_str("%26"),
            ' ' => escaped.push_str("%20"),
            '?' => escaped.push_str("%3F"),
            '#' => escaped.push_str("%23"),
            '=' => escaped.push_str("%3D"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape_text(text: &str) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let code: String = chars.by_ref().take(2).collect();
            let byte = u8::from_str_radix(&code, 16).ok()?;
            result.push(char::from(byte));
        } else {
            result.push(c);
        }
    }
    Some(result)
}

// ============================================================================
// DELIMITER RUNS
// ============================================================================

fn compress_delimiters(joined: &str) -> String {
    let mut result = String::with_capacity(joined.len());
    let mut run = 0;
    let flush = |result: &mut String, run: usize| {
        if run >= MIN_RUN {
            result.push(RUN_MARKER);
            result.push_str(&run.to_string());
            result.push(DELIMITER);
        } else {
            (0..run).for_each(|_| result.push(DELIMITER));
        }
    };
    for c in joined.chars() {
        if c == DELIMITER {
            run += 1;
        } else {
            flush(&mut result, run);
            run = 0;
            result.push(c);
        }
    }
    flush(&mut result, run);
    result
}

fn expand_delimiters(serialized: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(serialized.len());
    let mut chars = serialized.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if c != RUN_MARKER {
            result.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some((_, d)) = chars.next_if(|(_, d)| d.is_ascii_digit()) {
            digits.push(d);
        }
        let malformed = || ConfigError::Malformed {
            index: result.matches(DELIMITER).count(),
            token: serialized[pos..].chars().take(digits.len() + 2).collect(),
        };
        let count: usize = digits.parse().map_err(|_| malformed())?;
        if chars.next().map(|(_, d)| d) != Some(DELIMITER) {
            return Err(malformed());
        }
        (0..count).for_each(|_| result.push(DELIMITER));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectOption;
    use pretty_assertions::assert_eq;

    fn controls() -> Vec<ControlConfig> {
        vec![
            ControlConfig::range("sides", "Sides", 6.0, 3.0, 20.0, 1.0).structural(),
            ControlConfig::range("density", "Density", 40.0, 5.0, 200.0, 1.0).structural(),
            ControlConfig::range("rotation", "Rotation", 0.0, 0.0, 1.0, 0.01),
            ControlConfig::checkbox("reverse", "Reverse", false),
            ControlConfig::select(
                "easing",
                "Easing",
                "linear",
                vec![SelectOption::new("linear", "Linear"), SelectOption::new("easeIn", "Ease in")],
            ),
            ControlConfig::text("title", "Title", ""),
            ControlConfig::color("color", "Color", "#ffffff"),
        ]
    }

    #[test]
    fn leading_values_only() {
        let config = Config::new().with("sides", 9).with("density", 88);
        assert_eq!(serialize_config(&controls(), &config), "9_88");
    }

    #[test]
    fn defaults_are_omitted() {
        let config = crate::config::get_config_default_values(&controls());
        assert_eq!(serialize_config(&controls(), &config), "");
    }

    #[test]
    fn booleans_and_runs() {
        let config = Config::new().with("sides", 9).with("color", "#ff0000");
        // sides, 5 empty fields, color -> 6 delimiters in a row.
        assert_eq!(serialize_config(&controls(), &config), "9~6_ff0000");

        let config = Config::new().with("rotation", 0.25).with("reverse", true);
        assert_eq!(serialize_config(&controls(), &config), "__0.25_!1");
    }

    #[test]
    fn numbers_round_to_six_places() {
        let config = Config::new().with("rotation", 1.0 / 3.0);
        assert_eq!(serialize_config(&controls(), &config), "__0.333333");
    }

    #[test]
    fn round_trip_non_default_keys() {
        let config = Config::new()
            .with("sides", 12)
            .with("rotation", 0.125)
            .with("reverse", true)
            .with("easing", "easeIn")
            .with("title", "my_art ~ 100%")
            .with("color", "#00ff7f");
        let serialized = serialize_config(&controls(), &config);
        let restored = deserialize_config(&controls(), &serialized).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn round_trip_named_color() {
        let config = Config::new().with("color", "red");
        let restored =
            deserialize_config(&controls(), &serialize_config(&controls(), &config)).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn malformed_fields_are_errors() {
        assert!(matches!(
            deserialize_config(&controls(), "abc"),
            Err(ConfigError::Malformed { index: 0, .. })
        ));
        assert!(matches!(
            deserialize_config(&controls(), "9___!x"),
            Err(ConfigError::Malformed { index: 3, .. })
        ));
        assert!(deserialize_config(&controls(), "9~x_1").is_err());
    }

    #[test]
    fn extra_fields_ignored() {
        let restored = deserialize_config(&controls(), "9_88_______1_2_3").unwrap();
        assert_eq!(restored.number("sides"), 9.0);
        assert_eq!(restored.number("density"), 88.0);
    }

    #[test]
    fn url_round_trip() {
        assert_eq!(pattern_url("lotus", "9_88"), "?pattern=lotus&config=9_88");
        assert_eq!(pattern_url("lotus", ""), "?pattern=lotus");
        assert_eq!(
            parse_url("https://example.com/?pattern=lotus&config=9_88"),
            Some(PatternLink { pattern: "lotus".to_string(), config: "9_88".to_string() })
        );
        assert_eq!(
            parse_url("pattern=star"),
            Some(PatternLink { pattern: "star".to_string(), config: String::new() })
        );
        assert_eq!(parse_url("?config=1_2"), None);
    }

    #[test]
    fn link_characters_in_text_survive_the_url() {
        let config = Config::new().with("title", "why? #1 a=b");
        let serialized = serialize_config(&controls(), &config);
        assert!(!serialized.contains(['?', '#', '=', '&']), "{}", serialized);

        let link = parse_url(&pattern_url("lotus", &serialized)).unwrap();
        assert_eq!(link.config, serialized);
        let restored = deserialize_config(&controls(), &link.config).unwrap();
        assert_eq!(restored.text("title"), "why? #1 a=b");
    }

    #[test]
    fn delimiter_runs_round_trip() {
        for joined in ["a", "a_b", "a__b", "a___b", "a__________b"] {
            let compressed = compress_delimiters(joined);
            assert_eq!(expand_delimiters(&compressed).unwrap(), joined);
        }
        assert_eq!(compress_delimiters("a____b"), "a~4_b");
    }
}
