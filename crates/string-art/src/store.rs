//! Saved patterns and the storage capability hosts provide.
//!
//! The library never touches a disk or a database itself: a host implements
//! [`PatternStore`] and the helpers here turn engines into [`SavedPattern`]s
//! and back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{Artwork, PatternError};
use crate::patterns::Pattern;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no saved pattern named {0:?}")]
    NotFound(String),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is malformed: {0}")]
    Format(String),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// One named configuration, the unit a store keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPattern {
    pub name: String,
    /// Pattern id, as in share links.
    pub pattern: String,
    /// Serialized config string.
    #[serde(default)]
    pub config: String,
    /// RFC 3339 timestamp.
    pub saved_at: String,
}

impl SavedPattern {
    /// Snapshot `art` under `name`.
    pub fn from_artwork(name: impl Into<String>, art: &dyn Artwork, saved_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: art.id().to_string(),
            config: art.serialize_config(),
            saved_at: saved_at.into(),
        }
    }

    /// A fresh engine with this config applied.
    pub fn restore(&self) -> Result<Box<dyn Artwork>, PatternError> {
        let pattern = Pattern::from_name(&self.pattern)
            .ok_or_else(|| PatternError::UnknownPattern(self.pattern.clone()))?;
        pattern.restore(&self.config)
    }
}

/// Named-configuration storage.
pub trait PatternStore {
    /// Every saved pattern, oldest first.
    fn list(&self) -> Result<Vec<SavedPattern>, StoreError>;

    fn load(&self, name: &str) -> Result<SavedPattern, StoreError> {
        self.list()?
            .into_iter()
            .find(|saved| saved.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Insert, or replace the entry with the same name.
    fn save(&mut self, pattern: SavedPattern) -> Result<(), StoreError>;

    fn delete(&mut self, name: &str) -> Result<(), StoreError>;
}

/// Load `name` from `store` and rebuild its engine.
pub fn load_artwork(store: &dyn PatternStore, name: &str) -> Result<Box<dyn Artwork>, StoreError> {
    let saved = store.load(name)?;
    log::debug!("restoring {:?} ({}, config {:?})", saved.name, saved.pattern, saved.config);
    Ok(saved.restore()?)
}
