//! Snapshot persistence for the last-known model catalog
//!
//! The snapshot is the only durable state: one JSON file, overwritten
//! wholesale after each successful run. Saves go through a temp file and
//! rename so a crash mid-write never corrupts the next load.

use crate::error::Result;
use crate::openrouter::ModelEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed store for the previous run's catalog
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default snapshot path: ~/.local/share/price_watch/models_snapshot.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("price_watch")
            .join("models_snapshot.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous catalog.
    ///
    /// A missing or empty file means first run and loads as an empty
    /// catalog. A corrupt file is logged and also treated as empty, so a
    /// bad snapshot never wedges the watcher; only a real I/O failure is
    /// an error.
    pub fn load(&self) -> Result<Vec<ModelEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No previous snapshot at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&content) {
            Ok(models) => Ok(models),
            Err(e) => {
                log::warn!(
                    "Snapshot at {} is corrupt ({}), treating as first run",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the snapshot with the given catalog (write-then-rename).
    pub fn save(&self, models: &[ModelEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(models)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        log::info!(
            "Saved snapshot with {} models to {}",
            models.len(),
            self.path.display()
        );
        Ok(())
    }
}
