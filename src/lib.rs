//! `GlideGo` planner - road trip itineraries between two places
//!
//! This library geocodes the endpoints of a trip, samples attractions along
//! the way, routes candidate itineraries through them and attaches verified
//! hotel and cab inventory to each plan.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod inventory;
pub mod maps;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, TravelPlanRequest};
pub use cache::{MemoryCache, PersistentCache, PlanCache};
pub use config::GlideGoConfig;
pub use error::PlannerError;
pub use inventory::{InventoryStore, SnapshotInventory};
pub use maps::{DirectionsSource, Geocoder, GoogleMapsClient, PlacesSource};
pub use models::{PlanQuery, PointOfInterest, Tier, TravelPlan};
pub use planner::{MapsServices, PlannerSettings, TravelPlanner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
