//! Option parsing shared by the commands that build a pattern.

use string_art::config::{get_controls_index, ControlType};
use string_art::{Artwork, Config, ConfigValue, Dimensions, Pattern};

/// Canvas side used when `--size` is not given.
pub const DEFAULT_SIDE: f64 = 800.0;

/// Options common to `render`, `url`, `instructions` and `save`.
#[derive(Debug, Default)]
pub struct ArtArgs {
    pub pattern: Option<String>,
    /// Serialized config string (`-c`).
    pub config: Option<String>,
    /// `--set key=value` pairs, in order.
    pub sets: Vec<(String, String)>,
    pub size: Option<Dimensions>,
    pub position: Option<usize>,
    pub output: Option<String>,
}

/// Parse `<pattern> [-c CONFIG] [--set k=v]... [--size WxH] [--position N] [-o FILE]`.
pub fn parse_art_args(args: &[String]) -> Result<ArtArgs, String> {
    let mut parsed = ArtArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                parsed.config = Some(value_of(args, i, "--config")?.to_string());
            }
            "--set" => {
                i += 1;
                let pair = value_of(args, i, "--set")?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("--set expects key=value, got {:?}", pair))?;
                parsed.sets.push((key.to_string(), value.to_string()));
            }
            "--size" => {
                i += 1;
                parsed.size = Some(parse_size(value_of(args, i, "--size")?)?);
            }
            "--position" => {
                i += 1;
                let raw = value_of(args, i, "--position")?;
                parsed.position = Some(raw.parse().map_err(|_| format!("invalid position: {}", raw))?);
            }
            "-o" | "--output" => {
                i += 1;
                parsed.output = Some(value_of(args, i, "--output")?.to_string());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option: {}", other));
            }
            other => {
                if parsed.pattern.is_some() {
                    return Err(format!("unexpected argument: {}", other));
                }
                parsed.pattern = Some(other.to_string());
            }
        }
        i += 1;
    }
    Ok(parsed)
}

fn value_of<'a>(args: &'a [String], i: usize, option: &str) -> Result<&'a str, String> {
    args.get(i).map(String::as_str).ok_or_else(|| format!("{} needs a value", option))
}

/// Parse `WxH` (or a single number for a square).
pub fn parse_size(raw: &str) -> Result<Dimensions, String> {
    let invalid = || format!("invalid size: {} (expected WxH)", raw);
    let (width, height) = match raw.split_once(['x', 'X']) {
        Some((w, h)) => (w.trim().parse::<f64>(), h.trim().parse::<f64>()),
        None => (raw.trim().parse::<f64>(), raw.trim().parse::<f64>()),
    };
    match (width, height) {
        (Ok(width), Ok(height)) if width > 0.0 && height > 0.0 => Ok(Dimensions::new(width, height)),
        _ => Err(invalid()),
    }
}

pub fn find_pattern(name: &str) -> Result<Pattern, String> {
    Pattern::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Pattern::all().iter().map(Pattern::name).collect();
        format!("unknown pattern: {} (available: {})", name, known.join(", "))
    })
}

/// Typed value for `key`, parsed the way its control expects.
pub fn parse_value(art: &dyn Artwork, key: &str, raw: &str) -> Result<ConfigValue, String> {
    let index = get_controls_index(art.controls());
    let control = index.get(key).ok_or_else(|| format!("{} has no control named {:?}", art.id(), key))?;
    let invalid = |what: &str| format!("{} expects {}, got {:?}", key, what, raw);

    match control.control_type {
        ControlType::Checkbox => match raw {
            "true" | "1" | "yes" | "on" => Ok(ConfigValue::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(ConfigValue::Bool(false)),
            _ => Err(invalid("a boolean")),
        },
        ControlType::Range | ControlType::Number => {
            raw.parse::<f64>().map(ConfigValue::Number).map_err(|_| invalid("a number"))
        }
        ControlType::Select => Ok(control
            .attr
            .options
            .iter()
            .find(|option| option.value.to_string() == raw)
            .map(|option| option.value.clone())
            .unwrap_or_else(|| ConfigValue::from(raw))),
        ControlType::Color | ControlType::Text => Ok(ConfigValue::from(raw)),
        ControlType::Group => Err(format!("{} is a group, not a value", key)),
    }
}

/// Build the engine the options describe: pattern, then `-c`, then each `--set`.
pub fn build_artwork(args: &ArtArgs) -> Result<Box<dyn Artwork>, String> {
    let name = args.pattern.as_deref().ok_or("missing pattern name")?;
    let pattern = find_pattern(name)?;
    let mut art = match &args.config {
        Some(serialized) => pattern.restore(serialized),
        None => pattern.create(),
    }
    .map_err(|e| e.to_string())?;

    apply_sets(art.as_mut(), &args.sets)?;
    log::debug!("built {} with config {:?}", art.id(), art.serialize_config());
    Ok(art)
}

/// Merge `--set` pairs into the engine's config in one assignment.
pub fn apply_sets(art: &mut dyn Artwork, sets: &[(String, String)]) -> Result<(), String> {
    if sets.is_empty() {
        return Ok(());
    }
    let mut partial = Config::new();
    for (key, raw) in sets {
        partial.set(key.clone(), parse_value(art, key, raw)?);
    }
    art.assign_config(&partial).map_err(|e| e.to_string())
}

/// Remove a bare flag from `args`, reporting whether it was there.
pub fn take_flag(args: &[String], flag: &str) -> (bool, Vec<String>) {
    let rest: Vec<String> = args.iter().filter(|arg| *arg != flag).cloned().collect();
    (rest.len() != args.len(), rest)
}

/// Remove `option VALUE` from `args`, returning the value if present.
pub fn take_option(args: &[String], option: &str) -> Result<(Option<String>, Vec<String>), String> {
    let mut value = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        if args[i] == option {
            i += 1;
            value = Some(value_of(args, i, option)?.to_string());
        } else {
            rest.push(args[i].clone());
        }
        i += 1;
    }
    Ok((value, rest))
}

/// `--size`, or the default side fitted to the pattern's aspect ratio.
pub fn canvas_size(args: &ArtArgs, art: &dyn Artwork) -> Dimensions {
    args.size
        .unwrap_or_else(|| Dimensions::square(DEFAULT_SIDE).fit_aspect_ratio(art.aspect_ratio()))
}
