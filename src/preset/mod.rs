//! Named parameter sets, scoped to an owner.
//!
//! The gateway is the engine's only view of persistence: it stores flat
//! records and enforces ownership. Listing without an identity quietly
//! returns nothing; saving or deleting without one is an error. Deleting a
//! record that is missing or belongs to someone else fails the same way in
//! both cases, so callers cannot test for other owners' records.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PresetError;
use crate::patch::ParameterSet;

#[cfg(feature = "serde")]
mod json;
mod memory;

#[cfg(feature = "serde")]
pub use json::JsonFilePresets;
pub use memory::InMemoryPresets;

/// Authenticated identity of a preset owner.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresetId(pub u64);

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One persisted preset: `{ id, ownerId, name, oscillator, filter, ... }`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRecord {
    pub id: PresetId,
    #[cfg_attr(feature = "serde", serde(rename = "ownerId"))]
    pub owner: OwnerId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub params: ParameterSet,
}

pub trait PresetGateway {
    /// Records owned by `owner`, oldest first. Empty without an identity.
    fn list(&self, owner: Option<&OwnerId>) -> Vec<PresetRecord>;

    /// Store `params` under `name` and return the new record's id.
    fn save(&mut self, owner: Option<&OwnerId>, name: &str, params: &ParameterSet) -> Result<PresetId, PresetError>;

    /// Remove a record owned by `owner`.
    fn delete(&mut self, owner: Option<&OwnerId>, id: PresetId) -> Result<(), PresetError>;
}

/// Shared checks for `save`: identity, non-blank name, in-range parameters.
pub(crate) fn check_save<'a>(
    owner: Option<&'a OwnerId>,
    name: &str,
    params: &ParameterSet,
) -> Result<(&'a OwnerId, String), PresetError> {
    let owner = owner.ok_or(PresetError::AuthRequired)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(PresetError::EmptyName);
    }
    params.validate()?;
    Ok((owner, name.to_string()))
}
