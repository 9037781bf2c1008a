use std::time::Duration;

use serde::Serialize;

pub const COMBAT_POWER_MIN: u32 = 500;
pub const COMBAT_POWER_MAX: u32 = 1499;

// one normalized catalog entry, built from a single upstream payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    pub image_url: Option<String>,
    /// Synthetic value rolled per load, never read from the API.
    pub combat_power: u32,
    pub attack: u32,
    pub defense: u32,
    pub primary_type: String,
}

/// Result of walking the whole id range once.
///
/// `records` is sorted by id and never contains duplicates; ids that failed
/// are absent and only reflected in `failed`.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub records: Vec<PokemonRecord>,
    pub requested: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
