//! Error types and handling for the GlideGo planner

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for a travel plan request
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, correctable by the caller
    #[error("{message}")]
    Validation { message: String },

    /// The geocoding provider could not resolve a place name
    #[error("Geocode failed for {location}: {reason}")]
    Geocode { location: String, reason: String },

    /// The places provider rejected a nearby search
    #[error("Google Places API Error: {reason}")]
    Places { reason: String },

    /// Sampling found fewer distinct attractions than the route needs
    #[error("Not enough attractions found (got {found}, need {required}).")]
    InsufficientAttractions { found: usize, required: usize },

    /// Every itinerary attempt failed
    #[error("Could not generate any valid travel plans.")]
    NoValidPlans,

    /// Hotel or cab inventory could not be read
    #[error("Inventory lookup failed: {message}")]
    Inventory { message: String },

    /// Anything else
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocode<L: Into<String>, R: Into<String>>(location: L, reason: R) -> Self {
        Self::Geocode {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create a new places error
    pub fn places<S: Into<String>>(reason: S) -> Self {
        Self::Places {
            reason: reason.into(),
        }
    }

    /// Create a new inventory error
    pub fn inventory<S: Into<String>>(message: S) -> Self {
        Self::Inventory {
            message: message.into(),
        }
    }

    /// HTTP status the error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
