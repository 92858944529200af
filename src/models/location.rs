//! Coordinate value type

use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Point at `fraction` of the straight line from `self` to `other`
    #[must_use]
    pub fn interpolate(&self, other: &Coordinate, fraction: f64) -> Coordinate {
        Coordinate {
            latitude: self.latitude + (other.latitude - self.latitude) * fraction,
            longitude: self.longitude + (other.longitude - self.longitude) * fraction,
        }
    }

    /// `lat,lng` as the maps APIs expect it
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}
