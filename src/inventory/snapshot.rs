//! Inventory loaded from a JSON export of the hotel and cab tables

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::{Cab, Hotel, InventoryStore};

/// Shape of the export file
#[derive(Debug, Default, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub cabs: Vec<Cab>,
}

/// In-memory store over an inventory snapshot, ordered by record id
#[derive(Debug, Default)]
pub struct SnapshotInventory {
    hotels: Vec<Hotel>,
    cabs: Vec<Cab>,
}

impl SnapshotInventory {
    /// Inventory with no hotels or cabs
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and parse a snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading inventory snapshot from: {:?}", path);

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read inventory snapshot {}", path.display()))?;
        let snapshot: InventorySnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse inventory snapshot {}", path.display()))?;

        let inventory = Self::from_snapshot(snapshot);
        info!(
            "Loaded {} hotels and {} cabs ({} and {} listed)",
            inventory.hotels.len(),
            inventory.cabs.len(),
            inventory.hotels.iter().filter(|h| h.is_listed()).count(),
            inventory.cabs.iter().filter(|c| c.is_listed()).count()
        );
        Ok(inventory)
    }

    #[must_use]
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        let InventorySnapshot {
            mut hotels,
            mut cabs,
        } = snapshot;
        hotels.sort_by_key(|hotel| hotel.id);
        cabs.sort_by_key(|cab| cab.id);
        Self { hotels, cabs }
    }
}

impl InventoryStore for SnapshotInventory {
    fn verified_hotels(&self, limit: usize) -> Result<Vec<Hotel>> {
        Ok(self
            .hotels
            .iter()
            .filter(|hotel| hotel.is_listed())
            .take(limit)
            .cloned()
            .collect())
    }

    fn verified_cabs(&self, limit: usize) -> Result<Vec<Cab>> {
        Ok(self
            .cabs
            .iter()
            .filter(|cab| cab.is_listed())
            .take(limit)
            .cloned()
            .collect())
    }
}
