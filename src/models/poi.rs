//! Point of interest model

use serde::{Deserialize, Serialize};

/// Rating assumed when the places provider omits one
pub const DEFAULT_RATING: f64 = 4.0;

/// A tourist attraction candidate returned by a nearby search
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Provider identifier, unique per source
    #[serde(rename = "place_id")]
    pub id: String,
    pub name: String,
    pub vicinity: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    pub rating: f64,
    pub photo_url: String,
}

/// Sort by rating, best first. Stable, so equal ratings keep their order.
pub fn sort_by_rating(pois: &mut [PointOfInterest]) {
    pois.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}
