//! Travel plan models returned to clients

use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PointOfInterest;

/// Coarse budget classification
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Premium,
    Luxury,
}

impl Tier {
    /// Classify a `"<low>-<high>"` budget by its lower bound.
    /// Anything unparsable is `Standard`.
    #[must_use]
    pub fn from_budget(budget: &str) -> Self {
        let Some((low, high)) = budget.split_once('-') else {
            return Tier::Standard;
        };
        let (Ok(low), Ok(_)) = (low.trim().parse::<i64>(), high.trim().parse::<i64>()) else {
            return Tier::Standard;
        };

        if low >= 15_000 {
            Tier::Luxury
        } else if low >= 7_000 {
            Tier::Premium
        } else {
            Tier::Standard
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Standard => "standard",
            Tier::Premium => "premium",
            Tier::Luxury => "luxury",
        };
        write!(f, "{name}")
    }
}

/// Party size
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct People {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

/// Read projection of a verified hotel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotelSummary {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub facilities: Vec<String>,
    pub main_image: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub location: Option<String>,
    pub room_prices: Vec<f64>,
}

/// Read projection of a verified cab
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CabSummary {
    pub name: String,
    pub photo_url: String,
    pub price_per_km: f64,
    pub tier: Tier,
    pub rating: f64,
    pub driver_name: Option<String>,
    pub base_fare: f64,
    pub location: Option<String>,
}

/// One candidate itinerary
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelPlan {
    pub start: String,
    pub end: String,
    pub stops: Vec<PointOfInterest>,
    pub distance_km: f64,
    pub duration_hr: f64,
    pub map_url: String,
    pub dates: Vec<NaiveDate>,
    pub people: People,
    pub tier: Tier,
    pub hotels: Vec<HotelSummary>,
    pub cabs: Vec<CabSummary>,
}
