//! Configuration management for the GlideGo planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::error::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the planner service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlideGoConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Google Maps configuration
    pub maps: MapsConfig,
    /// Plan cache configuration
    pub cache: CacheConfig,
    /// Hotel and cab inventory source
    pub inventory: InventoryConfig,
    /// Itinerary generation limits
    pub planner: PlannerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single request, in seconds
    pub request_timeout_seconds: u32,
    pub max_body_bytes: usize,
}

/// Google Maps API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Geocoding API key
    pub geocode_api_key: Option<String>,
    /// Places API key, also embedded in attraction photo URLs
    pub places_api_key: Option<String>,
    /// Directions API key
    pub directions_api_key: Option<String>,
    /// Base URL for the maps web services
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Which cache implementation backs the plan cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Persistent,
    Memory,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Cache TTL in hours
    pub ttl_hours: u32,
    /// Cache directory location
    pub location: String,
}

/// Inventory configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// JSON snapshot of hotels and cabs. Without one the inventory is empty.
    pub snapshot_path: Option<PathBuf>,
}

/// Itinerary generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Points sampled between start and end
    pub sample_points: u32,
    /// Plans returned per request
    pub max_plans: u32,
    /// Stop combinations tried per request
    pub max_attempts: u32,
    /// Hotels and cabs attached to each plan
    pub inventory_limit: u32,
    /// Fixed seed for stop sampling, for reproducible runs
    pub rng_seed: Option<u64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP traces endpoint; spans are only exported when set
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    60
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_maps_timeout() -> u32 {
    30
}

fn default_cache_ttl() -> u32 {
    3
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("glidego").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".cache/glidego".to_string())
}

fn default_sample_points() -> u32 {
    4
}

fn default_max_plans() -> u32 {
    5
}

fn default_max_attempts() -> u32 {
    20
}

fn default_inventory_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            geocode_api_key: None,
            places_api_key: None,
            directions_api_key: None,
            base_url: default_maps_base_url(),
            timeout_seconds: default_maps_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Persistent,
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sample_points: default_sample_points(),
            max_plans: default_max_plans(),
            max_attempts: default_max_attempts(),
            inventory_limit: default_inventory_limit(),
            rng_seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl GlideGoConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("GLIDEGO_CONFIG").map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. GLIDEGO_MAPS__PLACES_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("GLIDEGO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GlideGoConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glidego").join("config.toml"))
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.maps.timeout_seconds == 0 {
            self.maps.timeout_seconds = default_maps_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.planner.sample_points == 0 {
            self.planner.sample_points = default_sample_points();
        }
        if self.planner.max_plans == 0 {
            self.planner.max_plans = default_max_plans();
        }
        if self.planner.max_attempts == 0 {
            self.planner.max_attempts = default_max_attempts();
        }
        if self.planner.inventory_limit == 0 {
            self.planner.inventory_limit = default_inventory_limit();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional at load time but must not be blank when given
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("geocode", &self.maps.geocode_api_key),
            ("places", &self.maps.places_api_key),
            ("directions", &self.maps.directions_api_key),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(PlannerError::config(format!(
                        "Maps {name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.maps.timeout_seconds > 300 {
            return Err(PlannerError::config("Maps API timeout cannot exceed 300 seconds").into());
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(
                PlannerError::config("Request timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.cache.ttl_hours > 168 {
            return Err(PlannerError::config("Cache TTL cannot exceed 168 hours (1 week)").into());
        }

        if self.planner.sample_points > 20 {
            return Err(PlannerError::config("Sample points cannot exceed 20").into());
        }

        if self.planner.max_plans > self.planner.max_attempts {
            return Err(PlannerError::config(
                "Maximum plans cannot exceed maximum attempts",
            )
            .into());
        }

        if self.planner.max_attempts > 100 {
            return Err(PlannerError::config("Maximum attempts cannot exceed 100").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !is_http_url(&self.maps.base_url) {
            return Err(
                PlannerError::config("Maps API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(
                    PlannerError::config("OTLP endpoint must be a valid HTTP or HTTPS URL").into(),
                );
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
