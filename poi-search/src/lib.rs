//! # poi-search
//!
//! Multi-source point-of-interest discovery for Roadtrip.
//!
//! This crate asks two heterogeneous POI sources for places near a location,
//! reconciles their answers into one ranked, deduplicated list under strict
//! per-source time budgets, and checks the final list for placeholder
//! content before handing it back.
//!
//! ## Design
//!
//! - A low-latency *primary* provider (on-device inference) and a
//!   higher-latency *secondary* provider (remote place catalog), both behind
//!   the [`PoiProvider`] trait
//! - Three strategies: hybrid (both concurrently), primary-first (catalog
//!   only when the local answer is weak) and secondary-only
//! - Primary-wins deduplication by normalised name, ranking by rating then
//!   distance
//! - A deny-list integrity guard that reports or rejects placeholder POIs
//! - Graceful degradation: a failed or timed-out provider contributes an
//!   empty list and its error is recorded, never raised
//!
//! ## Boundaries
//!
//! - Model execution and HTTP transport live behind [`InferenceBackend`] and
//!   [`CatalogClient`]; this crate ships no implementation of either
//! - Location names are logged only at trace level
//! - No state is shared between requests, except in an explicitly attached
//!   [`CachedProvider`]

pub mod cache;
pub mod config;
pub mod error;
pub mod integrity;
pub mod latency;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod strategy;
pub mod types;

pub use cache::CachedProvider;
pub use config::{CacheConfig, DiscoveryConfig, IntegrityConfig, IntegrityPolicy};
pub use error::{DiscoveryError, ProviderError, Result};
pub use integrity::{IntegrityGuard, IntegrityReport, Violation};
pub use latency::SimulatedLatency;
pub use orchestrator::search::{Orchestrator, SearchPhase};
pub use provider::{PoiProvider, QueryContext};
pub use providers::{
    CatalogClient, CatalogPlace, CatalogQuery, FixedProvider, InferenceBackend, InferenceOutput,
    InferencePrompt, LocalInferenceProvider, RemoteCatalogProvider,
};
pub use types::{
    Coordinates, Poi, ProviderKind, ProviderResponse, ProviderStatus, SearchRequest,
    SearchResult, SearchTiming, Strategy,
};

/// Run a single discovery request without keeping an [`Orchestrator`] around.
///
/// Builds an orchestrator from `primary`, `secondary` and `config`, runs
/// `request` and drops it. Use [`Orchestrator`] directly to serve many
/// requests with the same providers.
///
/// # Errors
///
/// Returns [`DiscoveryError::Config`] for an invalid `config`, otherwise the
/// same errors as [`Orchestrator::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> poi_search::Result<()> {
/// use poi_search::{Coordinates, DiscoveryConfig, FixedProvider, SearchRequest};
///
/// let primary = FixedProvider::new("local", Vec::new());
/// let secondary = FixedProvider::new("catalog", Vec::new());
/// let request = SearchRequest::new("Lost Lake, Oregon", Coordinates::new(45.4979, -121.8209), 8);
///
/// let result = poi_search::search(primary, secondary, &request, DiscoveryConfig::default()).await?;
/// for poi in &result.merged_results {
///     println!("{} ({:.1} mi)", poi.name, poi.distance_from_origin);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search<P, S>(
    primary: P,
    secondary: S,
    request: &SearchRequest,
    config: DiscoveryConfig,
) -> Result<SearchResult>
where
    P: PoiProvider,
    S: PoiProvider,
{
    Orchestrator::new(primary, secondary, config)?
        .search(request)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_with_empty_providers_is_ok() {
        let request =
            SearchRequest::new("Lost Lake, Oregon", Coordinates::new(45.4979, -121.8209), 8);
        let result = search(
            FixedProvider::new("local", Vec::new()),
            FixedProvider::new("catalog", Vec::new()),
            &request,
            DiscoveryConfig::default(),
        )
        .await
        .expect("search");
        assert!(result.merged_results.is_empty());
        assert_eq!(result.location, "Lost Lake, Oregon");
    }

    #[tokio::test]
    async fn search_rejects_invalid_config() {
        let request =
            SearchRequest::new("Lost Lake, Oregon", Coordinates::new(45.4979, -121.8209), 8);
        let config = DiscoveryConfig {
            primary_timeout_ms: 0,
            ..DiscoveryConfig::default()
        };
        let result = search(
            FixedProvider::new("local", Vec::new()),
            FixedProvider::new("catalog", Vec::new()),
            &request,
            config,
        )
        .await;
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }
}
