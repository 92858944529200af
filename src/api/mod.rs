use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::error::PlannerError;
use crate::models::{People, PlanQuery, TravelPlan, expand_dates};
use crate::planner::TravelPlanner;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest trip a single request may ask for
pub const MAX_TRIP_DAYS: u32 = 365;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TravelPlanner>,
}

impl AppState {
    pub fn new(planner: TravelPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

fn default_days() -> u32 {
    3
}

fn default_budget() -> String {
    "5000-7000".to_string()
}

/// Body of `POST /api/travel-plans/`
#[derive(Debug, Serialize, Deserialize)]
pub struct TravelPlanRequest {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_budget")]
    pub budget: String,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub people: People,
}

impl TravelPlanRequest {
    pub fn into_query(self) -> Result<PlanQuery, PlannerError> {
        let start = required_location(self.start);
        let end = required_location(self.end);
        let (Some(start), Some(end)) = (start, end) else {
            return Err(PlannerError::validation(
                "Start and end locations are required.",
            ));
        };

        if self.days > MAX_TRIP_DAYS {
            return Err(PlannerError::validation(format!(
                "Trips cannot be longer than {MAX_TRIP_DAYS} days."
            )));
        }

        let dates = self
            .dates
            .iter()
            .map(|date| {
                NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
                    PlannerError::validation(format!(
                        "Invalid date '{date}', expected YYYY-MM-DD."
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlanQuery {
            start,
            end,
            days: self.days,
            dates: expand_dates(&dates, self.days),
            budget: self.budget,
            people: self.people,
        })
    }
}

fn required_location(value: Option<String>) -> Option<String> {
    value
        .map(|location| location.trim().to_string())
        .filter(|location| !location.is_empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/travel-plans/", post(create_travel_plans))
        .route("/travel-plans", post(create_travel_plans))
        .route("/healthz", get(healthz))
}

async fn create_travel_plans(
    State(state): State<AppState>,
    payload: Result<Json<TravelPlanRequest>, JsonRejection>,
) -> Result<Json<Vec<TravelPlan>>, PlannerError> {
    let Json(request) = payload.map_err(|rejection| {
        info!("Rejected travel plan request: {}", rejection.body_text());
        PlannerError::validation(rejection.body_text())
    })?;
    let query = request.into_query()?;
    info!(
        "Travel plans requested: {} -> {} ({} days, budget {})",
        query.start, query.end, query.days, query.budget
    );

    match state.planner.plan(&query).await {
        Ok(plans) => Ok(Json(plans)),
        Err(e) => {
            error!("Travel plan generation failed: {}", failure_report(&e));
            Err(e)
        }
    }
}

/// Error message including the full cause chain of internal failures
fn failure_report(error: &PlannerError) -> String {
    match error {
        PlannerError::Internal(cause) => format!("{cause:#}"),
        other => other.to_string(),
    }
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(body: Value) -> TravelPlanRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults() {
        let query = request(json!({ "start": "Mysore", "end": "Ooty" }))
            .into_query()
            .unwrap();
        assert_eq!(query.days, 3);
        assert_eq!(query.budget, "5000-7000");
        assert!(query.dates.is_empty());
        assert_eq!(query.people, People::default());
    }

    #[rstest]
    #[case(json!({ "end": "Ooty" }))]
    #[case(json!({ "start": "Mysore" }))]
    #[case(json!({ "start": "   ", "end": "Ooty" }))]
    #[case(json!({ "start": "Mysore", "end": null }))]
    fn test_missing_locations(#[case] body: Value) {
        let err = request(body).into_query().unwrap_err();
        assert_eq!(err.to_string(), "Start and end locations are required.");
    }

    #[test]
    fn test_single_date_expands() {
        let query = request(json!({
            "start": "Mysore",
            "end": "Ooty",
            "days": 3,
            "dates": ["2025-12-30"],
            "people": { "adults": 2, "children": 1 }
        }))
        .into_query()
        .unwrap();

        let dates: Vec<String> = query.dates.iter().map(|d| d.to_string()).collect();
        assert_eq!(dates, ["2025-12-30", "2025-12-31", "2026-01-01"]);
        assert_eq!(query.people.adults, 2);
        assert_eq!(query.people.infants, 0);
    }

    #[test]
    fn test_trip_length_is_capped() {
        let query = request(json!({
            "start": "Mysore",
            "end": "Ooty",
            "days": MAX_TRIP_DAYS,
            "dates": ["2025-01-01"]
        }))
        .into_query()
        .unwrap();
        assert_eq!(query.dates.len(), MAX_TRIP_DAYS as usize);

        let err = request(json!({
            "start": "Mysore",
            "end": "Ooty",
            "days": 20_000_000,
            "dates": ["2025-01-01"]
        }))
        .into_query()
        .unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_failure_report_keeps_cause_chain() {
        let err = PlannerError::from(anyhow::anyhow!("disk full").context("cache write failed"));
        let report = failure_report(&err);
        assert!(report.contains("cache write failed"));
        assert!(report.contains("disk full"));

        let err = PlannerError::NoValidPlans;
        assert_eq!(
            failure_report(&err),
            "Could not generate any valid travel plans."
        );
    }

    #[test]
    fn test_invalid_date() {
        let err = request(json!({ "start": "Mysore", "end": "Ooty", "dates": ["30/12/2025"] }))
            .into_query()
            .unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
        assert!(err.to_string().contains("30/12/2025"));
    }
}
