//! Share links and threading instructions.

use string_art::Instructions;

use super::common::{build_artwork, canvas_size, parse_art_args, take_flag};

/// `url <pattern> [-c CONFIG] [--set k=v]...`
pub fn cmd_url(args: &[String]) -> Result<(), String> {
    let parsed = parse_art_args(args)?;
    let art = build_artwork(&parsed)?;
    println!("{}", art.share_url());
    Ok(())
}

/// `instructions <pattern> [-c CONFIG] [--set k=v]... [--json]`
pub fn cmd_instructions(args: &[String]) -> Result<(), String> {
    let (json, args) = take_flag(args, "--json");
    let parsed = parse_art_args(&args)?;
    let mut art = build_artwork(&parsed)?;
    let size = canvas_size(&parsed, art.as_ref());

    let instructions = Instructions::collect(art.as_mut(), size).map_err(|e| e.to_string())?;
    if json {
        let text = serde_json::to_string_pretty(&instructions).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        print!("{}", instructions);
    }
    Ok(())
}
