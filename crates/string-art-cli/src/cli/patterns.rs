//! Pattern listing - names, control trees, and counts.

use string_art::config::ControlType;
use string_art::{Artwork, ControlConfig, Pattern};

use super::common::{build_artwork, find_pattern, parse_art_args, take_flag};

pub fn cmd_patterns() -> Result<(), String> {
    println!("Available patterns:");
    for pattern in Pattern::all() {
        let metadata = pattern.metadata();
        println!("  {:<12} {} - {}", pattern.name(), metadata.label, metadata.description);
    }
    Ok(())
}

fn describe(control: &ControlConfig, art: &dyn Artwork) -> String {
    let mut line = format!("{} ({})", control.key, control.control_type.name());
    if let Some(value) = art.config().get(&control.key) {
        line.push_str(&format!(" = {}", value));
    }
    if control.control_type == ControlType::Range {
        let attr = control.resolve_attr(art.config());
        if let (Some(min), Some(max)) = (attr.min, attr.max) {
            line.push_str(&format!(" [{}..{}]", min, max));
        }
    }
    if control.control_type == ControlType::Select {
        let options: Vec<String> = control.attr.options.iter().map(|o| o.value.to_string()).collect();
        line.push_str(&format!(" {{{}}}", options.join("|")));
    }
    if control.is_structural {
        line.push_str(" *");
    }
    line
}

fn print_controls(controls: &[ControlConfig], art: &dyn Artwork, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    for control in controls {
        if !control.is_visible(art.config()) {
            continue;
        }
        if control.is_group() {
            println!("{}{}:", indent, control.label);
            print_controls(&control.children, art, depth + 1);
        } else {
            println!("{}{:<40} {}", indent, describe(control, art), control.label);
        }
    }
}

/// `controls <pattern> [-c CONFIG] [--set k=v]... [--json]`
pub fn cmd_controls(args: &[String]) -> Result<(), String> {
    let (json, args) = take_flag(args, "--json");
    let parsed = parse_art_args(&args)?;
    let art = build_artwork(&parsed)?;

    if json {
        let text = serde_json::to_string_pretty(art.controls()).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("{} controls (* rebuilds nails):", art.name());
    print_controls(art.controls(), art.as_ref(), 0);
    Ok(())
}

/// `info <pattern> [-c CONFIG] [--set k=v]...`
pub fn cmd_info(args: &[String]) -> Result<(), String> {
    let parsed = parse_art_args(args)?;
    let name = parsed.pattern.as_deref().ok_or("missing pattern name")?;
    let metadata = find_pattern(name)?.metadata();
    let art = build_artwork(&parsed)?;

    let changed = art.config().changed_keys(art.default_config());

    println!("{} ({})", metadata.label, art.id());
    println!("  {}", metadata.description);
    println!("  Nails:        {}", art.nail_count());
    println!("  Steps:        {}", art.step_count());
    println!("  Aspect ratio: {:.3}", art.aspect_ratio());
    println!("  Changed:      {}", if changed.is_empty() { "-".to_string() } else { changed.join(", ") });
    println!("  Config:       {}", art.serialize_config());
    println!("  Share link:   {}", art.share_url());
    Ok(())
}
