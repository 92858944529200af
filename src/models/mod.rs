//! Data models for the GlideGo planner
//!
//! - Location: coordinates
//! - Poi: tourist attractions found along a route
//! - Plan: itineraries and the inventory projections attached to them
//! - Query: the normalised request

pub mod location;
pub mod plan;
pub mod poi;
pub mod query;

pub use location::Coordinate;
pub use plan::{CabSummary, HotelSummary, People, Tier, TravelPlan};
pub use poi::{DEFAULT_RATING, PointOfInterest};
pub use query::{PlanQuery, expand_dates};
