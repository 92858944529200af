//! Attach verified hotel and cab inventory to generated plans

use std::sync::Arc;

use tracing::debug;

use crate::error::PlannerError;
use crate::inventory::{Cab, Hotel, InventoryStore};
use crate::models::{CabSummary, HotelSummary, Tier, TravelPlan};

const HOTEL_PLACEHOLDER: &str = "https://via.placeholder.com/400x300?text=Hotel+Image";
const CAB_PLACEHOLDER: &str = "https://via.placeholder.com/400x300?text=Cab+Image";

pub struct InventoryEnricher {
    store: Arc<dyn InventoryStore>,
    limit: usize,
}

impl InventoryEnricher {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Replace the plan's hotels and cabs with the current verified inventory.
    // TODO: narrow hotels by room price and cabs by category once each tier has a price band
    pub fn enrich(&self, plan: &mut TravelPlan) -> Result<(), PlannerError> {
        let hotels = self
            .store
            .verified_hotels(self.limit)
            .map_err(|e| PlannerError::inventory(format!("{e:#}")))?;
        let cabs = self
            .store
            .verified_cabs(self.limit)
            .map_err(|e| PlannerError::inventory(format!("{e:#}")))?;

        plan.hotels = hotels.iter().map(hotel_summary).collect();
        plan.cabs = cabs.iter().map(|cab| cab_summary(cab, plan.tier)).collect();
        debug!(
            "Attached {} hotels and {} cabs",
            plan.hotels.len(),
            plan.cabs.len()
        );
        Ok(())
    }
}

fn hotel_summary(hotel: &Hotel) -> HotelSummary {
    HotelSummary {
        name: hotel.name.clone(),
        address: hotel.address.clone(),
        description: hotel.description.clone(),
        facilities: split_facilities(hotel.facilities.as_deref()),
        main_image: hotel
            .main_image
            .clone()
            .unwrap_or_else(|| HOTEL_PLACEHOLDER.to_string()),
        contact_email: hotel.contact_email.clone(),
        contact_phone: hotel.contact_phone.clone(),
        location: hotel.location.clone(),
        room_prices: hotel.rooms.iter().map(|room| room.price).collect(),
    }
}

fn cab_summary(cab: &Cab, tier: Tier) -> CabSummary {
    let name = cab
        .vehicle
        .as_ref()
        .map(|vehicle| format!("{} {}", vehicle.brand, vehicle.model))
        .unwrap_or_else(|| "Unknown Cab".to_string());
    let photo_url = cab
        .vehicle
        .as_ref()
        .and_then(|vehicle| vehicle.vehicle_image.clone())
        .unwrap_or_else(|| CAB_PLACEHOLDER.to_string());

    CabSummary {
        name,
        photo_url,
        price_per_km: cab.price_per_km,
        tier,
        rating: cab.rating,
        driver_name: cab.driver.as_ref().map(|driver| driver.name.clone()),
        base_fare: cab.base_fare,
        location: cab.location.clone(),
    }
}

fn split_facilities(facilities: Option<&str>) -> Vec<String> {
    facilities
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|facility| !facility.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
