//! Travel plan generation
//!
//! The pipeline for one request:
//! - Cache lookup by request key; a hit returns immediately
//! - Geocoding of start and end
//! - Attraction sampling along the route, then dedup and ranking
//! - Itinerary generation over random stop combinations
//! - Inventory enrichment and caching of the final list

pub mod enrich;
pub mod itinerary;
pub mod ranking;
pub mod sampler;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use crate::cache::{self, PlanCache};
use crate::config::{GlideGoConfig, PlannerConfig};
use crate::error::PlannerError;
use crate::inventory::{InventoryStore, SnapshotInventory};
use crate::maps::{DirectionsSource, Geocoder, GoogleMapsClient, PlacesSource};
use crate::models::{PlanQuery, TravelPlan};

pub use enrich::InventoryEnricher;
pub use itinerary::{CombinationKey, GenerationLimits, PlanContext, generate_plans};
pub use ranking::dedupe_and_rank;
pub use sampler::{SamplingPolicy, sample_route};

/// How long a generated plan list stays cached
pub const PLAN_CACHE_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Tunables for a planner instance
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub sample_points: u32,
    pub limits: GenerationLimits,
    pub inventory_limit: usize,
    pub cache_ttl: Duration,
    pub rng_seed: Option<u64>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            sample_points: 4,
            limits: GenerationLimits::default(),
            inventory_limit: 10,
            cache_ttl: PLAN_CACHE_TTL,
            rng_seed: None,
        }
    }
}

impl PlannerSettings {
    #[must_use]
    pub fn from_config(planner: &PlannerConfig, cache_ttl_hours: u32) -> Self {
        Self {
            sample_points: planner.sample_points,
            limits: GenerationLimits {
                max_plans: planner.max_plans as usize,
                max_attempts: planner.max_attempts as usize,
            },
            inventory_limit: planner.inventory_limit as usize,
            cache_ttl: Duration::from_secs(u64::from(cache_ttl_hours) * 60 * 60),
            rng_seed: planner.rng_seed,
        }
    }
}

/// The external services a planner depends on
pub struct MapsServices {
    pub geocoder: Arc<dyn Geocoder>,
    pub places: Arc<dyn PlacesSource>,
    pub directions: Arc<dyn DirectionsSource>,
}

impl MapsServices {
    /// One client serving all three roles
    pub fn from_client<C>(client: C) -> Self
    where
        C: Geocoder + PlacesSource + DirectionsSource + 'static,
    {
        let client = Arc::new(client);
        Self {
            geocoder: client.clone(),
            places: client.clone(),
            directions: client,
        }
    }
}

/// Turns a [`PlanQuery`] into a list of enriched travel plans
pub struct TravelPlanner {
    maps: MapsServices,
    enricher: InventoryEnricher,
    cache: Arc<dyn PlanCache>,
    settings: PlannerSettings,
}

impl TravelPlanner {
    #[must_use]
    pub fn new(
        maps: MapsServices,
        inventory: Arc<dyn InventoryStore>,
        cache: Arc<dyn PlanCache>,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            maps,
            enricher: InventoryEnricher::new(inventory, settings.inventory_limit),
            cache,
            settings,
        }
    }

    /// Wire the Google Maps client, inventory snapshot and cache from configuration
    pub fn from_config(config: &GlideGoConfig) -> anyhow::Result<Self> {
        let maps = MapsServices::from_client(GoogleMapsClient::new(&config.maps)?);

        let inventory: Arc<dyn InventoryStore> = match &config.inventory.snapshot_path {
            Some(path) => Arc::new(SnapshotInventory::load(path)?),
            None => {
                warn!("No inventory snapshot configured, plans will carry no hotels or cabs");
                Arc::new(SnapshotInventory::empty())
            }
        };

        let cache: Arc<dyn PlanCache> =
            Arc::from(cache::from_config(&config.cache).with_context(|| {
                format!("Failed to open plan cache at {}", config.cache.location)
            })?);

        let settings = PlannerSettings::from_config(&config.planner, config.cache.ttl_hours);
        Ok(Self::new(maps, inventory, cache, settings))
    }

    /// Generate plans for `query`, or return the cached list for its key
    #[instrument(skip(self), fields(start = %query.start, end = %query.end))]
    pub async fn plan(&self, query: &PlanQuery) -> Result<Vec<TravelPlan>, PlannerError> {
        let cache_key = query.cache_key();
        match self.cache.get(&cache_key).await {
            Ok(Some(plans)) => {
                debug!("Returning cached plans for key: {}", cache_key);
                return Ok(plans);
            }
            Ok(None) => {}
            Err(e) => warn!("Plan cache lookup failed, generating afresh: {:#}", e),
        }

        let plans = self.generate(query).await?;

        match self
            .cache
            .set(&cache_key, &plans, self.settings.cache_ttl)
            .await
        {
            Ok(()) => info!(
                "Generated {} plans, cached with key: {}",
                plans.len(),
                cache_key
            ),
            Err(e) => warn!(
                "Generated {} plans but failed to cache them under {}: {:#}",
                plans.len(),
                cache_key,
                e
            ),
        }
        Ok(plans)
    }

    async fn generate(&self, query: &PlanQuery) -> Result<Vec<TravelPlan>, PlannerError> {
        let start = self.maps.geocoder.geocode(&query.start).await?;
        let end = self.maps.geocoder.geocode(&query.end).await?;

        let policy = SamplingPolicy::for_route(&query.start, &query.end);
        let sampled = sample_route(
            self.maps.places.as_ref(),
            start,
            end,
            self.settings.sample_points,
            policy.radius_km,
        )
        .await?;

        let attractions = dedupe_and_rank(sampled);
        if let Err(e) = policy.ensure_enough(&attractions) {
            warn!(
                "Only {} attractions found, need at least {}",
                attractions.len(),
                policy.min_attractions
            );
            return Err(e);
        }

        let context = PlanContext {
            start: &query.start,
            end: &query.end,
            dates: &query.dates,
            people: query.people,
            tier: query.tier(),
        };
        let mut tried: HashSet<CombinationKey> = HashSet::new();
        let mut rng = self.rng();
        let mut plans = generate_plans(
            self.maps.directions.as_ref(),
            &attractions,
            &context,
            self.settings.limits,
            &mut tried,
            &mut rng,
        )
        .await?;

        for plan in &mut plans {
            self.enricher.enrich(plan)?;
        }
        Ok(plans)
    }

    fn rng(&self) -> StdRng {
        match self.settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
