use std::collections::HashSet;

use crate::models::{PointOfInterest, poi::sort_by_rating};

/// Attractions the itinerary generator picks from
pub const MAX_RANKED_ATTRACTIONS: usize = 15;

/// Drop repeated identifiers (first occurrence wins), then order by rating,
/// best first, keeping at most [`MAX_RANKED_ATTRACTIONS`].
#[must_use]
pub fn dedupe_and_rank(pois: Vec<PointOfInterest>) -> Vec<PointOfInterest> {
    let mut seen = HashSet::new();
    let mut unique: Vec<PointOfInterest> = pois
        .into_iter()
        .filter(|poi| seen.insert(poi.id.clone()))
        .collect();

    sort_by_rating(&mut unique);
    unique.truncate(MAX_RANKED_ATTRACTIONS);
    unique
}
