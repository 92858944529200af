use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use glidego_planner::config::ServerConfig;
use glidego_planner::maps::{DirectionsError, RouteLeg};
use glidego_planner::models::Coordinate;
use glidego_planner::{
    AppState, DirectionsSource, Geocoder, MapsServices, MemoryCache, PlacesSource, PlannerError,
    PlannerSettings, PointOfInterest, SnapshotInventory, TravelPlanner, web,
};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt; // for `oneshot`

/// Canned Google Maps stand-in; every place search yields `per_point` attractions
struct StubMaps {
    geocodes: AtomicUsize,
    searches: AtomicUsize,
    per_point: usize,
}

impl StubMaps {
    fn new(per_point: usize) -> Arc<Self> {
        Arc::new(Self {
            geocodes: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            per_point,
        })
    }
}

#[async_trait]
impl Geocoder for StubMaps {
    async fn geocode(&self, location: &str) -> Result<Coordinate, PlannerError> {
        self.geocodes.fetch_add(1, Ordering::SeqCst);
        Ok(match location {
            "Mysore" => Coordinate::new(12.2958, 76.6394),
            _ => Coordinate::new(11.4102, 76.6950),
        })
    }
}

#[async_trait]
impl PlacesSource for StubMaps {
    async fn nearby_attractions(
        &self,
        center: Coordinate,
        _radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, PlannerError> {
        let call = self.searches.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.per_point)
            .map(|i| PointOfInterest {
                id: format!("place-{call}-{i}"),
                name: format!("Viewpoint {call}-{i}"),
                vicinity: "Nilgiris".to_string(),
                latitude: center.latitude,
                longitude: center.longitude,
                rating: 4.0 + i as f64 / 10.0,
                photo_url: "https://via.placeholder.com/400x300?text=No+Image".to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl DirectionsSource for StubMaps {
    async fn route_legs(
        &self,
        _origin: &str,
        _destination: &str,
        stops: &[PointOfInterest],
    ) -> Result<Vec<RouteLeg>, DirectionsError> {
        Ok(vec![
            RouteLeg {
                distance_meters: 40_000,
                duration_seconds: 3_000,
            };
            stops.len() + 1
        ])
    }
}

fn inventory_file(hotels: usize) -> tempfile::TempPath {
    let hotels: Vec<Value> = (1..=hotels)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Hotel {id}"),
                "facilities": "Pool, WiFi",
                "is_verified": true,
                "is_active": true,
                "rooms": [{ "room_type": "double", "price": 3200.0 }]
            })
        })
        .collect();
    let snapshot = json!({
        "hotels": hotels,
        "cabs": [{
            "id": 1,
            "vehicle": { "brand": "Toyota", "model": "Innova" },
            "driver": { "name": "Suresh" },
            "price_per_km": 14.0,
            "base_fare": 200.0,
            "rating": 4.6,
            "is_verified": true
        }]
    });

    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(snapshot.to_string().as_bytes()).unwrap();
    tmp.into_temp_path()
}

fn app(maps: Arc<StubMaps>, inventory: SnapshotInventory) -> Router {
    let services = MapsServices {
        geocoder: maps.clone(),
        places: maps.clone(),
        directions: maps,
    };
    let settings = PlannerSettings {
        rng_seed: Some(2024),
        ..PlannerSettings::default()
    };
    let planner = TravelPlanner::new(
        services,
        Arc::new(inventory),
        Arc::new(MemoryCache::new()),
        settings,
    );
    web::app(AppState::new(planner), &ServerConfig::default())
}

async fn post_plans(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/travel-plans/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(
    app: &Router,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/api/travel-plans/");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = app(StubMaps::new(5), SnapshotInventory::empty());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn missing_start_is_rejected() {
    let maps = StubMaps::new(5);
    let app = app(maps.clone(), SnapshotInventory::empty());

    let (status, body) = post_plans(&app, json!({ "end": "Ooty" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Start and end locations are required.");
    assert_eq!(maps.geocodes.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(None, "")]
#[case(Some("application/json"), "")]
#[case(Some("application/json"), "{")]
#[case(Some("application/json"), r#"{"start": "Mysore", "end": "Ooty", "days": "3"}"#)]
#[case(Some("text/plain"), r#"{"start": "Mysore", "end": "Ooty"}"#)]
#[tokio::test]
async fn malformed_bodies_get_json_errors(
    #[case] content_type: Option<&str>,
    #[case] body: &'static str,
) {
    let maps = StubMaps::new(5);
    let app = app(maps.clone(), SnapshotInventory::empty());

    let (status, body) = post_raw(&app, content_type, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(maps.geocodes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn overlong_trip_is_rejected() {
    let maps = StubMaps::new(5);
    let app = app(maps.clone(), SnapshotInventory::empty());

    let (status, body) = post_plans(
        &app,
        json!({
            "start": "Mysore",
            "end": "Ooty",
            "days": 20_000_000,
            "dates": ["2024-01-01"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trips cannot be longer than 365 days.");
    assert_eq!(maps.geocodes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generates_plans_with_expanded_dates() {
    let app = app(StubMaps::new(5), SnapshotInventory::empty());

    let (status, body) = post_plans(
        &app,
        json!({
            "start": "Mysore",
            "end": "Ooty",
            "days": 3,
            "budget": "7000-10000",
            "dates": ["2025-12-30"],
            "people": { "adults": 2, "children": 1, "infants": 0 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().unwrap();
    assert!(!plans.is_empty() && plans.len() <= 5);
    for plan in plans {
        assert_eq!(plan["start"], "Mysore");
        assert_eq!(plan["end"], "Ooty");
        assert_eq!(plan["stops"].as_array().unwrap().len(), 3);
        assert_eq!(plan["distance_km"], 160.0);
        assert_eq!(plan["duration_hr"], 3.33);
        assert_eq!(plan["tier"], "premium");
        assert_eq!(plan["dates"], json!(["2025-12-30", "2025-12-31", "2026-01-01"]));
        assert_eq!(plan["people"]["adults"], 2);
        assert!(
            plan["map_url"]
                .as_str()
                .unwrap()
                .starts_with("https://www.google.com/maps/dir/?api=1&origin=Mysore&destination=Ooty")
        );
    }
}

#[tokio::test]
async fn too_few_attractions_is_a_server_error() {
    let app = app(StubMaps::new(0), SnapshotInventory::empty());

    let (status, body) = post_plans(&app, json!({ "start": "Mysore", "end": "Ooty" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Not enough attractions found")
    );
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let maps = StubMaps::new(5);
    let app = app(maps.clone(), SnapshotInventory::empty());
    let request = json!({ "start": "Mysore", "end": "Ooty", "days": 2 });

    let (first_status, first) = post_plans(&app, request.clone()).await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(maps.geocodes.load(Ordering::SeqCst), 2);

    let (second_status, second) = post_plans(&app, request).await;
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(maps.geocodes.load(Ordering::SeqCst), 2);
    assert_eq!(maps.searches.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn plans_carry_at_most_ten_verified_hotels() {
    let snapshot = inventory_file(12);
    let inventory = SnapshotInventory::load(&snapshot).unwrap();
    let app = app(StubMaps::new(5), inventory);

    let (status, body) = post_plans(&app, json!({ "start": "Mysore", "end": "Ooty" })).await;

    assert_eq!(status, StatusCode::OK);
    for plan in body.as_array().unwrap() {
        let hotels = plan["hotels"].as_array().unwrap();
        assert_eq!(hotels.len(), 10);
        assert_eq!(hotels[0]["facilities"], json!(["Pool", "WiFi"]));

        let cabs = plan["cabs"].as_array().unwrap();
        assert_eq!(cabs.len(), 1);
        assert_eq!(cabs[0]["name"], "Toyota Innova");
        assert_eq!(cabs[0]["tier"], "standard");
    }
}
