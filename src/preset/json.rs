use std::path::{Path, PathBuf};

use super::{InMemoryPresets, OwnerId, PresetGateway, PresetId, PresetRecord};
use crate::error::PresetError;
use crate::patch::ParameterSet;

/// Preset store backed by a single JSON file (an array of records).
///
/// The whole file is rewritten after every successful save or delete. A
/// failed write rolls the in-memory change back so memory and disk agree.
#[derive(Debug)]
pub struct JsonFilePresets {
    path: PathBuf,
    store: InMemoryPresets,
}

impl JsonFilePresets {
    /// Open `path`, or start empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref().to_path_buf();
        let store = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let records: Vec<PresetRecord> = serde_json::from_str(&contents)?;
            log::info!("loaded {} presets from {}", records.len(), path.display());
            InMemoryPresets::from_records(records)?
        } else {
            InMemoryPresets::new()
        };
        Ok(Self { path, store })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PresetError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self.store.records())?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PresetGateway for JsonFilePresets {
    fn list(&self, owner: Option<&OwnerId>) -> Vec<PresetRecord> {
        self.store.list(owner)
    }

    fn save(&mut self, owner: Option<&OwnerId>, name: &str, params: &ParameterSet) -> Result<PresetId, PresetError> {
        let previous = self.store.clone();
        let id = self.store.save(owner, name, params)?;
        if let Err(err) = self.persist() {
            self.store = previous;
            return Err(err);
        }
        Ok(id)
    }

    fn delete(&mut self, owner: Option<&OwnerId>, id: PresetId) -> Result<(), PresetError> {
        let previous = self.store.clone();
        self.store.delete(owner, id)?;
        if let Err(err) = self.persist() {
            self.store = previous;
            return Err(err);
        }
        Ok(())
    }
}
