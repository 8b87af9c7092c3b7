use serde::{Deserialize, Serialize};

/// Identifier for a country in the reference store.
///
/// Ids are minted by the store builder when an entity is added; compute
/// functions accept ids only, never display names. This keeps name
/// resolution (with its typo and Unicode hazards) confined to load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(pub(crate) u32);

impl CountryId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a city in the reference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub(crate) u32);

impl CityId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a neighborhood in the reference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborhoodId(pub(crate) u32);

impl NeighborhoodId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a job title in the reference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTitleId(pub(crate) u32);

impl JobTitleId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
