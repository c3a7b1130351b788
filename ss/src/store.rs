//! Core SlotStore implementation

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The main slot store
///
/// Each slot is one JSON file in the base directory. Writes replace the slot
/// wholesale; reads fail soft on unreadable or malformed data.
pub struct SlotStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl SlotStore {
    /// Open or create a slot store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened slot store");
        Ok(Self { base_path })
    }

    /// Resolve a slot name to its backing file, rejecting unsafe names
    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && !slot.starts_with('.')
            && slot.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !valid {
            return Err(eyre::eyre!("Invalid slot name: '{}'", slot));
        }
        Ok(self.base_path.join(format!("{slot}.json")))
    }

    /// Read and deserialize a slot
    ///
    /// A missing, unreadable, or malformed slot is absent data, not an error.
    pub fn get<T: DeserializeOwned>(&self, slot: &str) -> Result<Option<T>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            debug!(slot, "get: slot not present");
            return Ok(None);
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(slot, error = %e, "get: failed to read slot, treating as absent");
                return Ok(None);
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(slot, error = %e, "get: slot holds malformed JSON, treating as absent");
                Ok(None)
            }
        }
    }

    /// Read a slot's raw contents without deserializing (for inspection)
    pub fn get_raw(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .context(format!("Failed to read slot '{}'", slot))
    }

    /// Serialize and write a value into a slot, replacing any prior contents
    pub fn put<T: Serialize>(&self, slot: &str, value: &T) -> Result<()> {
        let path = self.slot_path(slot)?;
        let json = serde_json::to_string_pretty(value).context(format!("Failed to serialize slot '{}'", slot))?;
        fs::write(&path, json).context(format!("Failed to write slot '{}'", slot))?;
        debug!(slot, "put: wrote slot");
        Ok(())
    }

    /// Delete a slot, returning whether it existed
    pub fn delete(&self, slot: &str) -> Result<bool> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).context(format!("Failed to delete slot '{}'", slot))?;
        info!(slot, "Deleted slot");
        Ok(true)
    }

    /// List all populated slot names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                slots.push(stem.to_string());
            }
        }

        slots.sort();
        Ok(slots)
    }

    /// Delete every slot in the store
    pub fn clear(&self) -> Result<()> {
        for slot in self.list()? {
            self.delete(&slot)?;
        }
        info!("Cleared all slots");
        Ok(())
    }
}
