//! Integration tests for string-art CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the binary Cargo built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_string-art"))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env_remove("STRING_ART_STORE")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("string-art-cli-{}-{}", std::process::id(), name))
}

#[test]
fn patterns_command_lists_all_patterns() {
    let output = run(&["patterns"]);
    assert!(output.status.success());

    let stdout = stdout(&output);
    for id in ["circle", "star", "polygon", "lotus", "maurer_rose", "comet", "parabola"] {
        assert!(stdout.contains(id), "Should list '{}' pattern", id);
    }
    assert_eq!(stdout.lines().count(), 8, "header plus one line per pattern");
}

#[test]
fn render_command_produces_svg() {
    let output = run(&["render", "star", "--set", "sideNails=8", "--size", "300x300"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout(&output);
    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<svg"), "Should have SVG element");
    assert!(stdout.contains("<path"), "Should have string paths");
    assert!(stdout.contains("<circle"), "Should have nails");
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn render_command_writes_png() {
    let path = temp_path("render.png");
    let output = run(&["render", "circle", "--set", "n=60", "--size", "200x200", "-o", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let _ = fs::remove_file(&path);
}

#[test]
fn url_command_uses_the_short_config() {
    let output = run(&["url", "lotus", "--set", "sides=9", "--set", "density=88"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "?pattern=lotus&config=9_88");
}

#[test]
fn instructions_command_lists_nail_numbers() {
    let output = run(&["instructions", "parabola", "--set", "n=2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "Layer 1 (#ffffff): 0 → 1 → 2\n");
}

#[test]
fn instructions_command_json() {
    let output = run(&["instructions", "parabola", "--set", "n=2", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["pattern"], "parabola");
    assert_eq!(value["step_count"], 2);
    assert_eq!(value["layers"][0]["runs"][0], serde_json::json!([0, 1, 2]));
}

#[test]
fn controls_command_json_is_the_control_tree() {
    let output = run(&["controls", "comet", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let keys: Vec<&str> = value.as_array().unwrap().iter().filter_map(|c| c["key"].as_str()).collect();
    assert!(keys.contains(&"n"));
    assert!(keys.contains(&"displacement"));
}

#[test]
fn store_round_trip() {
    let store = temp_path("store.yaml");
    let store_arg = store.to_str().unwrap();

    let saved = run(&["save", "nine", "lotus", "-c", "9_88", "--store", store_arg]);
    assert!(saved.status.success(), "{}", String::from_utf8_lossy(&saved.stderr));

    let listed = stdout(&run(&["list", "--store", store_arg]));
    assert!(listed.contains("nine"));
    assert!(listed.contains("9_88"));

    let loaded = run(&["load", "nine", "--size", "200x200", "--store", store_arg]);
    assert!(loaded.status.success(), "{}", String::from_utf8_lossy(&loaded.stderr));
    assert!(stdout(&loaded).contains("<svg"));

    assert!(run(&["delete", "nine", "--store", store_arg]).status.success());
    assert!(!run(&["delete", "nine", "--store", store_arg]).status.success());
    let _ = fs::remove_file(&store);
}

#[test]
fn unknown_pattern_fails() {
    let output = run(&["render", "spirograph"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown pattern"));
}

#[test]
fn unknown_control_fails() {
    let output = run(&["render", "circle", "--set", "wobble=3"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("wobble"));
}
