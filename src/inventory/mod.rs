//! Hotel and cab inventory
//!
//! The planner only reads inventory. Records are owned by the hotel and cab
//! back offices; this module models the subset of their fields the planner
//! projects into a plan, and the read-only store contract it queries.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod snapshot;

pub use snapshot::SnapshotInventory;

/// Read-only access to verified inventory
pub trait InventoryStore: Send + Sync {
    /// Up to `limit` hotels that are both verified and active
    fn verified_hotels(&self, limit: usize) -> Result<Vec<Hotel>>;

    /// Up to `limit` cabs that are both verified and active
    fn verified_cabs(&self, limit: usize) -> Result<Vec<Cab>>;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hotel {
    pub id: u64,
    pub name: Option<String>,
    /// Map link to the property
    pub location: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// Comma-separated facility names
    pub facilities: Option<String>,
    pub main_image: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// Only the price is projected; other room columns in an export are ignored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Room {
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub vehicle_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Driver {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cab {
    pub id: u64,
    pub vehicle: Option<Vehicle>,
    pub driver: Option<Driver>,
    pub location: Option<String>,
    pub price_per_km: f64,
    #[serde(default)]
    pub base_fare: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Hotel {
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.is_verified && self.is_active
    }
}

impl Cab {
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.is_verified && self.is_active
    }
}

fn default_true() -> bool {
    true
}
