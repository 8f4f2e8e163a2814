use super::{check_save, OwnerId, PresetGateway, PresetId, PresetRecord};
use crate::error::PresetError;
use crate::patch::ParameterSet;

/// Preset store held in memory. Ids increase monotonically and are never reused.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPresets {
    records: Vec<PresetRecord>,
    next_id: u64,
}

impl InMemoryPresets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from existing records, validating each one.
    pub fn from_records(records: Vec<PresetRecord>) -> Result<Self, PresetError> {
        for record in &records {
            record.params.validate()?;
        }
        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        Ok(Self { records, next_id })
    }

    /// Every record regardless of owner.
    pub fn records(&self) -> &[PresetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PresetGateway for InMemoryPresets {
    fn list(&self, owner: Option<&OwnerId>) -> Vec<PresetRecord> {
        let Some(owner) = owner else {
            return Vec::new();
        };
        self.records.iter().filter(|r| &r.owner == owner).cloned().collect()
    }

    fn save(&mut self, owner: Option<&OwnerId>, name: &str, params: &ParameterSet) -> Result<PresetId, PresetError> {
        let (owner, name) = check_save(owner, name, params)?;

        self.next_id += 1;
        let id = PresetId(self.next_id);
        self.records.push(PresetRecord {
            id,
            owner: owner.clone(),
            name,
            params: *params,
        });
        log::debug!("saved preset {id} for {owner}");
        Ok(id)
    }

    fn delete(&mut self, owner: Option<&OwnerId>, id: PresetId) -> Result<(), PresetError> {
        let owner = owner.ok_or(PresetError::AuthRequired)?;
        let index = self
            .records
            .iter()
            .position(|r| r.id == id && &r.owner == owner)
            .ok_or(PresetError::NotFoundOrUnauthorized)?;
        self.records.remove(index);
        log::debug!("deleted preset {id} for {owner}");
        Ok(())
    }
}
