//! Core types: POIs, requests, provider responses and search results.
//!
//! Everything here is request-scoped. Values are built fresh for each
//! search and dropped once the [`SearchResult`] has been handed back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProviderError;
use crate::integrity::IntegrityReport;

/// Rating at or above which a POI is flagged as a revenue candidate.
pub const REVENUE_RATING_THRESHOLD: f64 = 4.0;

/// Price level used when a source does not report one (1–4 scale).
pub const DEFAULT_PRICE_LEVEL: u8 = 2;

/// Highest rating a POI may carry.
pub const MAX_RATING: f64 = 5.0;

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and within the
    /// ±90 / ±180 degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in miles (haversine).
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Lowercase and trim a category tag. Categories are an open set.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// One discoverable place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Identifier, unique within the response of the provider that produced it.
    pub id: String,
    /// Display name, also the merge key after normalisation.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Open category tag, e.g. `lodging`, `hiking`, `scenic`.
    pub category: String,
    pub coordinates: Coordinates,
    /// Distance from the request origin in miles.
    pub distance_from_origin: f64,
    /// Rating in `[0.0, 5.0]`.
    pub rating: f64,
    #[serde(default = "default_price_level")]
    pub price_level: u8,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub review_summary: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Derived from `rating`; see [`REVENUE_RATING_THRESHOLD`].
    #[serde(default)]
    pub could_earn_revenue: bool,
}

fn default_price_level() -> u8 {
    DEFAULT_PRICE_LEVEL
}

impl Poi {
    /// Build a POI with empty optional fields and the default price level.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: &str,
        coordinates: Coordinates,
        distance_from_origin: f64,
        rating: f64,
    ) -> Self {
        let mut poi = Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: normalize_category(category),
            coordinates,
            distance_from_origin,
            rating,
            price_level: DEFAULT_PRICE_LEVEL,
            image_url: None,
            review_summary: None,
            address: None,
            could_earn_revenue: false,
        };
        poi.refresh_derived();
        poi
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = price_level;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_review_summary(mut self, summary: impl Into<String>) -> Self {
        self.review_summary = Some(summary.into());
        self
    }

    /// Recompute derived fields. Call after deserialising or mutating `rating`.
    pub fn refresh_derived(&mut self) {
        self.category = normalize_category(&self.category);
        self.could_earn_revenue = self.rating >= REVENUE_RATING_THRESHOLD;
    }

    /// Check the field constraints a provider must uphold.
    ///
    /// Returns a human-readable reason on failure; adapters wrap it in
    /// [`ProviderError::InvalidResponse`].
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err(format!("POI '{}' has an empty id", self.name));
        }
        if self.name.trim().is_empty() {
            return Err(format!("POI '{}' has an empty name", self.id));
        }
        if !self.coordinates.is_valid() {
            return Err(format!(
                "POI '{}' has invalid coordinates ({}, {})",
                self.name, self.coordinates.latitude, self.coordinates.longitude
            ));
        }
        if !self.distance_from_origin.is_finite() || self.distance_from_origin < 0.0 {
            return Err(format!(
                "POI '{}' has invalid distance {}",
                self.name, self.distance_from_origin
            ));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "POI '{}' has rating {} outside [0, 5]",
                self.name, self.rating
            ));
        }
        Ok(())
    }
}

/// How providers are invoked for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Query both providers concurrently and merge whatever arrives.
    #[default]
    Hybrid,
    /// Query the local provider first; fall back to the catalog unless the
    /// local answer is confident and non-empty.
    PrimaryFirst,
    /// Query only the remote catalog.
    SecondaryOnly,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::PrimaryFirst => "primary_first",
            Self::SecondaryOnly => "secondary_only",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which provider slot a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local inference-based discoverer.
    Primary,
    /// Remote catalog API.
    Secondary,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A search request as supplied by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub location_name: String,
    /// Required; a missing origin rejects the request.
    pub origin: Option<Coordinates>,
    #[serde(default)]
    pub category: Option<String>,
    pub max_results: usize,
    #[serde(default)]
    pub strategy: Strategy,
}

impl SearchRequest {
    pub fn new(location_name: impl Into<String>, origin: Coordinates, max_results: usize) -> Self {
        Self {
            location_name: location_name.into(),
            origin: Some(origin),
            category: None,
            max_results,
            strategy: Strategy::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// The validated query shape handed to every provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub location_name: String,
    pub origin: Coordinates,
    /// Normalised category filter, if any.
    pub category: Option<String>,
    /// Maximum number of POIs the provider should return.
    pub limit: usize,
}

/// What a provider hands back on success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOutput {
    pub pois: Vec<Poi>,
    /// Self-reported confidence in `[0, 1]`; `None` for sources that do not
    /// score themselves.
    pub confidence: Option<f64>,
}

impl ProviderOutput {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self {
            pois,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Outcome of one provider call as recorded on the result.
///
/// Either `error` is `None` and `pois` holds the full list, or `error` is set
/// and `pois` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider: ProviderKind,
    pub pois: Vec<Poi>,
    pub elapsed_ms: u64,
    pub confidence: Option<f64>,
    pub error: Option<ProviderError>,
}

impl ProviderResponse {
    pub fn from_outcome(
        provider: ProviderKind,
        outcome: std::result::Result<ProviderOutput, ProviderError>,
        elapsed_ms: u64,
    ) -> Self {
        match outcome {
            Ok(output) => Self {
                provider,
                pois: output.pois,
                elapsed_ms,
                confidence: output.confidence,
                error: None,
            },
            Err(error) => Self {
                provider,
                pois: Vec::new(),
                elapsed_ms,
                confidence: None,
                error: Some(error),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> ProviderStatus {
        match &self.error {
            None => ProviderStatus::Ok,
            Some(ProviderError::Unavailable(_)) => ProviderStatus::Unavailable,
            Some(ProviderError::Timeout(_)) => ProviderStatus::Timeout,
            Some(ProviderError::InvalidResponse(_)) => ProviderStatus::InvalidResponse,
        }
    }
}

/// Per-provider outcome as shown in timing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Ok,
    Unavailable,
    Timeout,
    InvalidResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTiming {
    pub elapsed_ms: u64,
    pub status: ProviderStatus,
}

/// Timing telemetry for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTiming {
    /// `None` when the provider was not invoked.
    pub primary: Option<ProviderTiming>,
    pub secondary: Option<ProviderTiming>,
    /// Wall-clock time of the whole search.
    pub total_ms: u64,
}

/// The assembled answer to a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub location: String,
    pub strategy_used: Strategy,
    pub primary_response: Option<ProviderResponse>,
    pub secondary_response: Option<ProviderResponse>,
    /// Deduplicated, ranked POIs; never longer than the request's `max_results`.
    pub merged_results: Vec<Poi>,
    pub timing: SearchTiming,
    pub integrity_report: IntegrityReport,
}
