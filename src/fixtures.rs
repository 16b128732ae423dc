//! POI fixture files for the demo providers.
//!
//! A fixture is a JSON array of POIs in the same shape `poi-search`
//! serialises them. Derived fields are recomputed on load, so fixtures only
//! need the source data.

use std::path::Path;

use poi_search::{FixedProvider, Poi, SimulatedLatency};

use crate::error::{AppError, Result};

/// Load and validate a POI fixture file.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the file cannot be read, or
/// [`AppError::Fixture`] if it is not a valid POI array.
pub fn load_pois(path: &Path) -> Result<Vec<Poi>> {
    let content = std::fs::read_to_string(path)?;
    parse_pois(&content).map_err(|e| match e {
        AppError::Fixture(msg) => AppError::Fixture(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parse a JSON POI array, recompute derived fields and check every POI.
///
/// # Errors
///
/// Returns [`AppError::Fixture`] for malformed JSON or an invalid POI.
pub fn parse_pois(json: &str) -> Result<Vec<Poi>> {
    let mut pois: Vec<Poi> =
        serde_json::from_str(json).map_err(|e| AppError::Fixture(e.to_string()))?;
    for poi in &mut pois {
        poi.refresh_derived();
        poi.validate().map_err(AppError::Fixture)?;
    }
    Ok(pois)
}

/// Build a fixed-list provider over `pois` with optional simulated latency.
pub fn fixture_provider(
    name: &str,
    pois: Vec<Poi>,
    latency: Option<SimulatedLatency>,
    confidence: Option<f64>,
) -> FixedProvider {
    let mut provider = FixedProvider::new(name, pois);
    if let Some(latency) = latency {
        provider = provider.with_latency(latency);
    }
    if let Some(confidence) = confidence {
        provider = provider.with_confidence(confidence);
    }
    provider
}
