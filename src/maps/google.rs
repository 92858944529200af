//! Google Maps Platform client
//!
//! Implements [`Geocoder`], [`PlacesSource`] and [`DirectionsSource`] on top of
//! the Geocoding, Places Nearby Search and Directions web services. Each
//! service is called once per request, without retries; a failed call is
//! reported to the caller, which decides whether it is fatal.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{DirectionsError, DirectionsSource, Geocoder, PlacesSource, RouteLeg};
use crate::config::MapsConfig;
use crate::error::PlannerError;
use crate::models::{Coordinate, DEFAULT_RATING, PointOfInterest};

const ATTRACTION_PLACEHOLDER: &str = "https://via.placeholder.com/400x300?text=Attraction+Image";
const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Client for the three Google Maps services the planner uses
pub struct GoogleMapsClient {
    client: Client,
    base_url: String,
    geocode_key: String,
    places_key: String,
    directions_key: String,
}

impl GoogleMapsClient {
    /// Build a client from configuration. All three API keys must be set.
    pub fn new(config: &MapsConfig) -> Result<Self, PlannerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("glidego-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geocode_key: required_key(&config.geocode_api_key, "maps.geocode_api_key")?,
            places_key: required_key(&config.places_api_key, "maps.places_api_key")?,
            directions_key: required_key(&config.directions_api_key, "maps.directions_api_key")?,
        })
    }

    /// Errors are stripped of the request URL, which carries the API key.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> reqwest::Result<T> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let body = response
            .json::<T>()
            .await
            .map_err(reqwest::Error::without_url)?;
        debug!("Maps API responded in {:.3}s", started.elapsed().as_secs_f64());
        Ok(body)
    }
}

fn required_key(key: &Option<String>, name: &str) -> Result<String, PlannerError> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(PlannerError::config(format!("Missing {name}"))),
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, location: &str) -> Result<Coordinate, PlannerError> {
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(location),
            urlencoding::encode(&self.geocode_key)
        );

        let response: GeocodeResponse = self
            .fetch_json(&url)
            .await
            .map_err(|e| PlannerError::geocode(location, e.to_string()))?;

        let coordinate = response
            .into_coordinate()
            .map_err(|reason| PlannerError::geocode(location, reason))?;
        debug!(
            "Geocoded '{}' to ({:.4}, {:.4})",
            location, coordinate.latitude, coordinate.longitude
        );
        Ok(coordinate)
    }
}

#[async_trait]
impl PlacesSource for GoogleMapsClient {
    #[instrument(skip(self), fields(center = %center.to_query_param()))]
    async fn nearby_attractions(
        &self,
        center: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, PlannerError> {
        let url = format!(
            "{}/maps/api/place/nearbysearch/json?location={}&radius={}&type=tourist_attraction&key={}",
            self.base_url,
            center.to_query_param(),
            radius_meters,
            urlencoding::encode(&self.places_key)
        );

        let response: PlacesResponse = self
            .fetch_json(&url)
            .await
            .map_err(|e| PlannerError::places(e.to_string()))?;

        let attractions = response
            .into_attractions(&self.base_url, &self.places_key)
            .map_err(PlannerError::places)?;
        if attractions.is_empty() {
            warn!("No attractions found around {}", center.to_query_param());
        }
        Ok(attractions)
    }
}

#[async_trait]
impl DirectionsSource for GoogleMapsClient {
    #[instrument(skip(self, stops), fields(stops = stops.len()))]
    async fn route_legs(
        &self,
        origin: &str,
        destination: &str,
        stops: &[PointOfInterest],
    ) -> Result<Vec<RouteLeg>, DirectionsError> {
        let url = format!(
            "{}/maps/api/directions/json?origin={}&destination={}&waypoints={}&key={}",
            self.base_url,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            urlencoding::encode(&waypoints_param(stops)),
            urlencoding::encode(&self.directions_key)
        );

        let response: DirectionsResponse = self
            .fetch_json(&url)
            .await
            .map_err(|e| DirectionsError::Transport(e.to_string()))?;

        response.into_legs()
    }
}

/// `optimize:true|place_id:..|..`, or empty when there are no stops
fn waypoints_param(stops: &[PointOfInterest]) -> String {
    if stops.is_empty() {
        return String::new();
    }
    let ids = stops
        .iter()
        .map(|stop| format!("place_id:{}", stop.id))
        .collect::<Vec<_>>()
        .join("|");
    format!("optimize:true|{ids}")
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

impl GeocodeResponse {
    fn into_coordinate(self) -> Result<Coordinate, String> {
        if self.status != STATUS_OK {
            return Err(self.status);
        }
        self.results
            .into_iter()
            .next()
            .map(|result| {
                let location = result.geometry.location;
                Coordinate::new(location.lat, location.lng)
            })
            .ok_or(self.status)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: Option<String>,
    name: Option<String>,
    vicinity: Option<String>,
    rating: Option<f64>,
    geometry: Option<PlaceGeometry>,
    #[serde(default)]
    photos: Vec<PlacePhoto>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
}

impl PlacesResponse {
    fn into_attractions(self, base_url: &str, key: &str) -> Result<Vec<PointOfInterest>, String> {
        if self.status == STATUS_ZERO_RESULTS {
            return Ok(Vec::new());
        }
        if self.status != STATUS_OK {
            if let Some(message) = &self.error_message {
                warn!("Places API error {}: {}", self.status, message);
            }
            return Err(self.status);
        }

        Ok(self
            .results
            .into_iter()
            .filter_map(|place| {
                let location = place.geometry?.location?;
                let id = place.place_id?;
                let photo_url = match place.photos.first() {
                    Some(photo) => format!(
                        "{}/maps/api/place/photo?maxwidth=400&photoreference={}&key={}",
                        base_url,
                        urlencoding::encode(&photo.photo_reference),
                        urlencoding::encode(key)
                    ),
                    None => ATTRACTION_PLACEHOLDER.to_string(),
                };
                Some(PointOfInterest {
                    id,
                    name: place.name.unwrap_or_else(|| "Unknown Attraction".to_string()),
                    vicinity: place.vicinity.unwrap_or_else(|| "Unknown Location".to_string()),
                    latitude: location.lat,
                    longitude: location.lng,
                    rating: place.rating.unwrap_or(DEFAULT_RATING),
                    photo_url,
                })
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: ValueField,
    duration: ValueField,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: u64,
}

impl DirectionsResponse {
    fn into_legs(self) -> Result<Vec<RouteLeg>, DirectionsError> {
        if self.status != STATUS_OK {
            return Err(DirectionsError::Status {
                status: self.status,
                message: self.error_message,
            });
        }
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or(DirectionsError::NoRoutes)?;
        Ok(route
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
            })
            .collect())
    }
}
