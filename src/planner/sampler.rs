//! Attraction sampling along the line between start and end

use tracing::{debug, instrument};

use crate::error::PlannerError;
use crate::maps::PlacesSource;
use crate::models::{Coordinate, PointOfInterest, poi::sort_by_rating};

/// Attractions kept per sample point
pub const ATTRACTIONS_PER_POINT: usize = 3;

/// Search radius and minimum attraction count for a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPolicy {
    pub radius_km: u32,
    pub min_attractions: usize,
}

impl SamplingPolicy {
    /// Trips that start and end in the same place search wider and accept fewer
    /// attractions.
    #[must_use]
    pub fn for_route(start: &str, end: &str) -> Self {
        if start.to_lowercase() == end.to_lowercase() {
            Self {
                radius_km: 50,
                min_attractions: 3,
            }
        } else {
            Self {
                radius_km: 30,
                min_attractions: 5,
            }
        }
    }

    pub fn ensure_enough(&self, attractions: &[PointOfInterest]) -> Result<(), PlannerError> {
        if attractions.len() < self.min_attractions {
            return Err(PlannerError::InsufficientAttractions {
                found: attractions.len(),
                required: self.min_attractions,
            });
        }
        Ok(())
    }
}

/// Points to search around: `start` alone when the endpoints coincide,
/// otherwise `count` evenly spaced points strictly between them.
#[must_use]
pub fn sample_points(start: Coordinate, end: Coordinate, count: u32) -> Vec<Coordinate> {
    if start == end {
        return vec![start];
    }
    let segments = f64::from(count + 1);
    (1..=count)
        .map(|i| start.interpolate(&end, f64::from(i) / segments))
        .collect()
}

/// Query attractions around every sample point and keep the best few of each.
/// The first failing query aborts sampling.
#[instrument(skip(places))]
pub async fn sample_route(
    places: &dyn PlacesSource,
    start: Coordinate,
    end: Coordinate,
    num_points: u32,
    radius_km: u32,
) -> Result<Vec<PointOfInterest>, PlannerError> {
    let radius_meters = radius_km.saturating_mul(1000);
    let mut sampled = Vec::new();

    for point in sample_points(start, end, num_points) {
        let mut nearby = places.nearby_attractions(point, radius_meters).await?;
        sort_by_rating(&mut nearby);
        nearby.truncate(ATTRACTIONS_PER_POINT);
        debug!(
            "Kept {} attractions around {}",
            nearby.len(),
            point.to_query_param()
        );
        sampled.extend(nearby);
    }

    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::Mutex;

    struct FakePlaces {
        calls: Mutex<Vec<(Coordinate, u32)>>,
        fail: bool,
    }

    impl FakePlaces {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl PlacesSource for FakePlaces {
        async fn nearby_attractions(
            &self,
            center: Coordinate,
            radius_meters: u32,
        ) -> Result<Vec<PointOfInterest>, PlannerError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((center, radius_meters));
                calls.len()
            };
            if self.fail {
                return Err(PlannerError::places("OVER_QUERY_LIMIT"));
            }
            Ok([3.9, 4.7, 4.1, 4.9, 3.0]
                .iter()
                .enumerate()
                .map(|(i, rating)| PointOfInterest {
                    id: format!("call{call}-{i}"),
                    name: format!("Attraction {i}"),
                    vicinity: "Nearby".to_string(),
                    latitude: center.latitude,
                    longitude: center.longitude,
                    rating: *rating,
                    photo_url: String::new(),
                })
                .collect())
        }
    }

    #[rstest]
    #[case("Goa", "Goa", 50, 3)]
    #[case("Goa", "GOA", 50, 3)]
    #[case("Mysore", "Ooty", 30, 5)]
    fn test_policy(
        #[case] start: &str,
        #[case] end: &str,
        #[case] radius_km: u32,
        #[case] min_attractions: usize,
    ) {
        assert_eq!(
            SamplingPolicy::for_route(start, end),
            SamplingPolicy {
                radius_km,
                min_attractions
            }
        );
    }

    #[test]
    fn test_ensure_enough() {
        let policy = SamplingPolicy::for_route("Mysore", "Ooty");
        let err = policy.ensure_enough(&[]).unwrap_err();
        assert!(err.to_string().contains("Not enough attractions found"));
        assert!(err.to_string().contains("got 0, need 5"));
    }

    #[test]
    fn test_sample_points_between_endpoints() {
        let start = Coordinate::new(0.0, 0.0);
        let end = Coordinate::new(10.0, 20.0);
        let points = sample_points(start, end, 4);
        assert_eq!(
            points,
            vec![
                Coordinate::new(2.0, 4.0),
                Coordinate::new(4.0, 8.0),
                Coordinate::new(6.0, 12.0),
                Coordinate::new(8.0, 16.0),
            ]
        );
    }

    #[test]
    fn test_sample_points_same_place() {
        let here = Coordinate::new(15.3, 74.1);
        assert_eq!(sample_points(here, here, 4), vec![here]);
    }

    #[tokio::test]
    async fn test_sample_route_keeps_top_three_per_point() {
        let places = FakePlaces::new(false);
        let pois = sample_route(
            &places,
            Coordinate::new(0.0, 0.0),
            Coordinate::new(5.0, 5.0),
            4,
            30,
        )
        .await
        .unwrap();

        assert_eq!(pois.len(), 12);
        let first_point: Vec<f64> = pois.iter().take(3).map(|p| p.rating).collect();
        assert_eq!(first_point, [4.9, 4.7, 4.1]);

        let calls = places.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, radius)| *radius == 30_000));
    }

    #[tokio::test]
    async fn test_sample_route_same_place_queries_once() {
        let places = FakePlaces::new(false);
        let here = Coordinate::new(15.3, 74.1);
        let pois = sample_route(&places, here, here, 4, 50).await.unwrap();
        assert_eq!(pois.len(), 3);
        assert_eq!(*places.calls.lock().unwrap(), vec![(here, 50_000)]);
    }

    #[tokio::test]
    async fn test_sample_route_surfaces_places_error() {
        let places = FakePlaces::new(true);
        let result = sample_route(
            &places,
            Coordinate::new(0.0, 0.0),
            Coordinate::new(5.0, 5.0),
            4,
            30,
        )
        .await;
        assert!(matches!(result, Err(PlannerError::Places { .. })));
        assert_eq!(places.calls.lock().unwrap().len(), 1);
    }
}
