//! Itinerary generation
//!
//! Candidate itineraries are built by drawing random stop combinations from
//! the ranked attractions and asking the directions provider for a route
//! through each. A combination is never tried twice: the set of tried
//! combinations is owned by the caller and passed in. A failed directions
//! lookup only discards its own combination.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::error::PlannerError;
use crate::maps::{DirectionsError, DirectionsSource, map_url};
use crate::models::{People, PointOfInterest, Tier, TravelPlan};

/// Stops per itinerary
pub const STOPS_PER_PLAN: usize = 3;

/// Sorted stop identifiers; equal keys mean the same set of stops
pub type CombinationKey = Vec<String>;

/// Request data copied into every plan
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub dates: &'a [NaiveDate],
    pub people: People,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    pub max_plans: usize,
    pub max_attempts: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_plans: 5,
            max_attempts: 20,
        }
    }
}

#[must_use]
pub fn combination_key(stops: &[PointOfInterest]) -> CombinationKey {
    let mut key: Vec<String> = stops.iter().map(|stop| stop.id.clone()).collect();
    key.sort();
    key
}

/// Uniformly draw up to [`STOPS_PER_PLAN`] distinct attractions
pub fn draw_stops<R: Rng + ?Sized>(
    attractions: &[PointOfInterest],
    rng: &mut R,
) -> Vec<PointOfInterest> {
    let amount = attractions.len().min(STOPS_PER_PLAN);
    rand::seq::index::sample(rng, attractions.len(), amount)
        .into_iter()
        .map(|index| attractions[index].clone())
        .collect()
}

/// Route one stop combination and turn it into a plan without inventory
pub async fn attempt_plan(
    directions: &dyn DirectionsSource,
    stops: Vec<PointOfInterest>,
    context: &PlanContext<'_>,
) -> Result<TravelPlan, DirectionsError> {
    let legs = directions
        .route_legs(context.start, context.end, &stops)
        .await?;

    let meters: u64 = legs.iter().map(|leg| leg.distance_meters).sum();
    let seconds: u64 = legs.iter().map(|leg| leg.duration_seconds).sum();

    Ok(TravelPlan {
        start: context.start.to_string(),
        end: context.end.to_string(),
        map_url: map_url(context.start, context.end, &stops),
        stops,
        distance_km: round2(meters as f64 / 1000.0),
        duration_hr: round2(seconds as f64 / 3600.0),
        dates: context.dates.to_vec(),
        people: context.people,
        tier: context.tier,
        hotels: Vec::new(),
        cabs: Vec::new(),
    })
}

/// Build up to `limits.max_plans` plans in at most `limits.max_attempts`
/// draws. Combinations already in `tried` are skipped and every new one is
/// recorded there. Fails only when no plan could be built at all.
#[instrument(skip_all, fields(attractions = attractions.len()))]
pub async fn generate_plans<R: Rng + ?Sized>(
    directions: &dyn DirectionsSource,
    attractions: &[PointOfInterest],
    context: &PlanContext<'_>,
    limits: GenerationLimits,
    tried: &mut HashSet<CombinationKey>,
    rng: &mut R,
) -> Result<Vec<TravelPlan>, PlannerError> {
    let mut plans = Vec::new();
    let mut attempts = 0;

    while plans.len() < limits.max_plans && attempts < limits.max_attempts {
        attempts += 1;

        let stops = draw_stops(attractions, rng);
        if !tried.insert(combination_key(&stops)) {
            debug!("Combination already tried, drawing again");
            continue;
        }

        match attempt_plan(directions, stops, context).await {
            Ok(plan) => plans.push(plan),
            Err(e) => warn!("Skipping stop combination due to error: {}", e),
        }
    }

    debug!(
        "Generated {} plans in {} attempts ({} distinct combinations)",
        plans.len(),
        attempts,
        tried.len()
    );

    if plans.is_empty() {
        return Err(PlannerError::NoValidPlans);
    }
    Ok(plans)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
