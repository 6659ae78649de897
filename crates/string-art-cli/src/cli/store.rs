//! Named configurations kept in a YAML file.
//!
//! The file is picked from `--store PATH`, then `$STRING_ART_STORE`, then
//! `string-art.yaml` in the working directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use string_art::store::load_artwork;
use string_art::{PatternStore, SavedPattern, StoreError};

use super::common::{apply_sets, build_artwork, parse_art_args, take_option};
use super::render::{render_svg, write_output};

pub const STORE_ENV: &str = "STRING_ART_STORE";
pub const DEFAULT_STORE: &str = "string-art.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    patterns: Vec<SavedPattern>,
}

/// [`PatternStore`] over one YAML file. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct YamlStore {
    path: PathBuf,
}

impl YamlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        serde_yaml::from_str(&text).map_err(|e| StoreError::Format(e.to_string()))
    }

    fn write(&self, file: &StoreFile) -> Result<(), StoreError> {
        let text = serde_yaml::to_string(file).map_err(|e| StoreError::Format(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PatternStore for YamlStore {
    fn list(&self) -> Result<Vec<SavedPattern>, StoreError> {
        Ok(self.read()?.patterns)
    }

    fn save(&mut self, pattern: SavedPattern) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.patterns.retain(|saved| saved.name != pattern.name);
        file.patterns.push(pattern);
        self.write(&file)
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let mut file = self.read()?;
        let before = file.patterns.len();
        file.patterns.retain(|saved| saved.name != name);
        if file.patterns.len() == before {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.write(&file)
    }
}

/// Split `--store` off `args` and open the store it names.
fn open_store(args: &[String]) -> Result<(YamlStore, Vec<String>), String> {
    let (explicit, rest) = take_option(args, "--store")?;
    let path = explicit
        .or_else(|| env::var(STORE_ENV).ok())
        .unwrap_or_else(|| DEFAULT_STORE.to_string());
    log::debug!("using store {}", path);
    Ok((YamlStore::new(path), rest))
}

/// `save <name> <pattern> [-c CONFIG] [--set k=v]... [--store PATH]`
pub fn cmd_save(args: &[String]) -> Result<(), String> {
    let (mut store, args) = open_store(args)?;
    let (name, rest) = args.split_first().ok_or("missing name to save under")?;
    let parsed = parse_art_args(rest)?;
    let art = build_artwork(&parsed)?;

    let saved = SavedPattern::from_artwork(name.as_str(), art.as_ref(), Utc::now().to_rfc3339());
    store.save(saved).map_err(|e| e.to_string())?;
    eprintln!("Saved {} ({}) to {}", name, art.share_url(), store.path().display());
    Ok(())
}

/// `load <name> [--set k=v]... [--size WxH] [--position N] [-o FILE] [--store PATH]`
pub fn cmd_load(args: &[String]) -> Result<(), String> {
    let (store, args) = open_store(args)?;
    let parsed = parse_art_args(&args)?;
    let name = parsed.pattern.as_deref().ok_or("missing name to load")?;
    if parsed.config.is_some() {
        return Err("load takes its config from the store; use --set to adjust it".to_string());
    }

    let mut art = load_artwork(&store, name).map_err(|e| e.to_string())?;
    apply_sets(art.as_mut(), &parsed.sets)?;
    let (svg, size) = render_svg(art.as_mut(), &parsed)?;
    write_output(&svg, size, parsed.output.as_deref())
}

/// `list [--store PATH]`
pub fn cmd_list(args: &[String]) -> Result<(), String> {
    let (store, _) = open_store(args)?;
    let saved = store.list().map_err(|e| e.to_string())?;
    if saved.is_empty() {
        eprintln!("No saved patterns in {}", store.path().display());
        return Ok(());
    }
    for entry in saved {
        println!("{:<20} {:<12} {:<24} {}", entry.name, entry.pattern, entry.config, entry.saved_at);
    }
    Ok(())
}

/// `delete <name> [--store PATH]`
pub fn cmd_delete(args: &[String]) -> Result<(), String> {
    let (mut store, args) = open_store(args)?;
    let name = args.first().ok_or("missing name to delete")?;
    store.delete(name).map_err(|e| e.to_string())?;
    eprintln!("Deleted {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use string_art::{Config, Pattern};

    fn temp_store(name: &str) -> YamlStore {
        let path = env::temp_dir().join(format!("string-art-{}-{}.yaml", name, std::process::id()));
        let _ = fs::remove_file(&path);
        YamlStore::new(path)
    }

    #[test]
    fn missing_file_is_empty() {
        let store = temp_store("missing");
        assert_eq!(store.list().unwrap(), vec![]);
    }

    #[test]
    fn save_replace_delete() {
        let mut store = temp_store("cycle");
        let first = Pattern::Circle.create().unwrap();
        let second = Pattern::Circle.create_with(&Config::new().with("multiplier", 3.0)).unwrap();

        store.save(SavedPattern::from_artwork("mine", first.as_ref(), "t1")).unwrap();
        store.save(SavedPattern::from_artwork("mine", second.as_ref(), "t2")).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].saved_at, "t2");

        let restored = load_artwork(&store, "mine").unwrap();
        assert_eq!(restored.config().number("multiplier"), 3.0);

        store.delete("mine").unwrap();
        assert!(matches!(store.delete("mine"), Err(StoreError::NotFound(_))));
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn malformed_file_is_a_format_error() {
        let store = temp_store("malformed");
        fs::write(store.path(), "patterns: [[[").unwrap();
        assert!(matches!(store.list(), Err(StoreError::Format(_))));
        let _ = fs::remove_file(store.path());
    }
}
