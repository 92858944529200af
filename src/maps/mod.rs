//! External mapping services
//!
//! The planner talks to three services: geocoding, nearby places search and
//! directions. Each is a trait so the pipeline can run against a real
//! provider or a test double.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::PlannerError;
use crate::models::{Coordinate, PointOfInterest};

pub mod google;

pub use google::GoogleMapsClient;

/// Resolves a place name to a coordinate
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location: &str) -> Result<Coordinate, PlannerError>;
}

/// Finds tourist attractions around a point
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn nearby_attractions(
        &self,
        center: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, PlannerError>;
}

/// Routes from an origin to a destination through a set of stops
#[async_trait]
pub trait DirectionsSource: Send + Sync {
    /// Legs of the first route the provider returns
    async fn route_legs(
        &self,
        origin: &str,
        destination: &str,
        stops: &[PointOfInterest],
    ) -> Result<Vec<RouteLeg>, DirectionsError>;
}

/// One leg of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

/// Failure of a single directions lookup
#[derive(Error, Debug)]
pub enum DirectionsError {
    #[error("Directions API error: {status}")]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("No routes found")]
    NoRoutes,

    #[error("Directions request failed: {0}")]
    Transport(String),
}

/// Shareable Google Maps link for a route through `stops`
#[must_use]
pub fn map_url(origin: &str, destination: &str, stops: &[PointOfInterest]) -> String {
    let waypoints = stops
        .iter()
        .map(|stop| urlencoding::encode(&stop.name).into_owned())
        .collect::<Vec<_>>()
        .join("|");
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}&waypoints={}",
        urlencoding::encode(origin),
        urlencoding::encode(destination),
        waypoints
    )
}
