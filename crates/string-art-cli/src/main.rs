//! string-art - CLI for string art patterns
//!
//! Usage:
//!   string-art patterns                        List available patterns
//!   string-art controls <pattern>              Show a pattern's controls
//!   string-art render <pattern> [options]      Draw to SVG or PNG
//!   string-art instructions <pattern>          Nail sequence for threading by hand

mod cli;

use std::env;

use cli::{
    cmd_controls, cmd_delete, cmd_info, cmd_instructions, cmd_list, cmd_load, cmd_patterns,
    cmd_render, cmd_save, cmd_url,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("string-art");
    if args.len() < 2 {
        print_usage(prog);
        std::process::exit(1);
    }

    let rest = &args[2..];
    let result = match args[1].as_str() {
        "patterns" => cmd_patterns(),
        "controls" => cmd_controls(rest),
        "info" => cmd_info(rest),
        "render" => cmd_render(rest),
        "url" => cmd_url(rest),
        "instructions" => cmd_instructions(rest),
        "save" => cmd_save(rest),
        "load" => cmd_load(rest),
        "list" => cmd_list(rest),
        "delete" => cmd_delete(rest),
        "help" | "--help" | "-h" => {
            print_usage(prog);
            return;
        }
        other => Err(format!("unknown command: {} (try `{} help`)", other, prog)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("string-art - string art patterns, drawn step by step");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} patterns", prog);
    eprintln!("  {} controls <pattern> [art options] [--json]", prog);
    eprintln!("  {} info <pattern> [art options]", prog);
    eprintln!("  {} render <pattern> [art options] [-o <file>]", prog);
    eprintln!("  {} url <pattern> [art options]", prog);
    eprintln!("  {} instructions <pattern> [art options] [--json]", prog);
    eprintln!("  {} save <name> <pattern> [art options] [--store <file>]", prog);
    eprintln!("  {} load <name> [--set k=v]... [-o <file>] [--store <file>]", prog);
    eprintln!("  {} list [--store <file>]", prog);
    eprintln!("  {} delete <name> [--store <file>]", prog);
    eprintln!();
    eprintln!("Art options:");
    eprintln!("  -c, --config <s>      Serialized config, as in share links");
    eprintln!("  --set <key>=<value>   Override one control (repeatable)");
    eprintln!("  --size <WxH>          Canvas size (default: 800 on the long side)");
    eprintln!("  --position <n>        Draw only the first n steps");
    eprintln!("  -o, --output <file>   .svg or .png (default: SVG on stdout)");
    eprintln!();
    eprintln!("Store:");
    eprintln!("  --store <file>, then $STRING_ART_STORE, then ./string-art.yaml");
    eprintln!();
    eprintln!("Logging:");
    eprintln!("  RUST_LOG=debug {} render circle", prog);
}
