//! Provider-private TTL cache for POI answers.
//!
//! [`CachedProvider`] wraps any [`PoiProvider`] and remembers successful
//! answers keyed by (location, rounded origin, category, limit). Uses
//! [`moka`] for async-friendly caching with TTL and automatic eviction.
//! Each wrapper owns its own cache; there is no process-wide instance.

use std::time::Duration;

use moka::future::Cache;

use crate::config::CacheConfig;
use crate::error::ProviderError;
use crate::provider::{PoiProvider, QueryContext};
use crate::types::{ProviderOutput, ProviderQuery};

/// Origins closer than this many decimal places share a cache entry
/// (3 places ≈ 110 m).
const COORDINATE_PRECISION: f64 = 1_000.0;

/// Composite cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Lowercased, trimmed location name.
    location: String,
    lat_e3: i64,
    lon_e3: i64,
    category: Option<String>,
    limit: usize,
}

impl CacheKey {
    /// Build a deterministic key for `query`.
    pub fn new(query: &ProviderQuery) -> Self {
        Self {
            location: query.location_name.trim().to_lowercase(),
            lat_e3: round_coordinate(query.origin.latitude),
            lon_e3: round_coordinate(query.origin.longitude),
            category: query.category.clone(),
            limit: query.limit,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_coordinate(value: f64) -> i64 {
    (value * COORDINATE_PRECISION).round() as i64
}

/// Caching decorator over a provider.
///
/// Errors are never cached, so a provider that recovers is picked up on the
/// next call. When caching is disabled in config the wrapper is a plain
/// pass-through.
pub struct CachedProvider<P> {
    inner: P,
    cache: Option<Cache<CacheKey, ProviderOutput>>,
}

impl<P: PoiProvider> CachedProvider<P> {
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_seconds))
                .build()
        });
        Self { inner, cache }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached answer.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl<P: PoiProvider> PoiProvider for CachedProvider<P> {
    async fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> Result<ProviderOutput, ProviderError> {
        let Some(cache) = &self.cache else {
            return self.inner.query(query, ctx).await;
        };

        let key = CacheKey::new(query);
        if let Some(hit) = cache.get(&key).await {
            tracing::debug!(provider = self.inner.name(), count = hit.pois.len(), "cache hit");
            return Ok(hit);
        }

        let output = self.inner.query(query, ctx).await?;
        cache.insert(key, output.clone()).await;
        Ok(output)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FixedProvider;
    use crate::types::{Coordinates, Poi};

    fn query(location: &str, lat: f64, lon: f64) -> ProviderQuery {
        ProviderQuery {
            location_name: location.into(),
            origin: Coordinates::new(lat, lon),
            category: None,
            limit: 8,
        }
    }

    fn fixture() -> FixedProvider {
        FixedProvider::new(
            "catalog",
            vec![Poi::new(
                "ChIJ123",
                "Lost Lake Resort",
                "lodging",
                Coordinates::new(45.5, -121.8),
                0.3,
                4.1,
            )],
        )
    }

    #[test]
    fn cache_key_deterministic_for_same_inputs() {
        let a = CacheKey::new(&query("Lost Lake, Oregon", 45.4979, -121.8209));
        let b = CacheKey::new(&query("  lost lake, oregon ", 45.4979, -121.8209));
        assert_eq!(a, b);
    }

    #[test]
    fn nearby_origins_share_a_key() {
        let a = CacheKey::new(&query("Lost Lake", 45.49791, -121.82092));
        let b = CacheKey::new(&query("Lost Lake", 45.49788, -121.82088));
        assert_eq!(a, b);
    }

    #[test]
    fn cache_key_differs_when_inputs_differ() {
        let base = query("Lost Lake", 45.4979, -121.8209);
        let mut other_category = base.clone();
        other_category.category = Some("lodging".into());
        let mut other_limit = base.clone();
        other_limit.limit = 3;

        assert_ne!(CacheKey::new(&base), CacheKey::new(&other_category));
        assert_ne!(CacheKey::new(&base), CacheKey::new(&other_limit));
        assert_ne!(
            CacheKey::new(&base),
            CacheKey::new(&query("Lost Lake", 45.51, -121.8209))
        );
    }

    #[tokio::test]
    async fn second_identical_query_is_served_from_cache() {
        let provider = CachedProvider::new(fixture(), &CacheConfig::default());
        let ctx = QueryContext::with_budget(Duration::from_secs(1));
        let q = query("Lost Lake, Oregon", 45.4979, -121.8209);

        let first = provider.query(&q, &ctx).await.expect("ok");
        let second = provider.query(&q, &ctx).await.expect("ok");
        assert_eq!(first, second);
        assert_eq!(provider.inner().call_count(), 1);

        provider.invalidate_all();
        provider.query(&q, &ctx).await.expect("ok");
        assert_eq!(provider.inner().call_count(), 2);
    }

    #[tokio::test]
    async fn disabled_cache_passes_through() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let provider = CachedProvider::new(fixture(), &config);
        let ctx = QueryContext::with_budget(Duration::from_secs(1));
        let q = query("Lost Lake, Oregon", 45.4979, -121.8209);
        provider.query(&q, &ctx).await.expect("ok");
        provider.query(&q, &ctx).await.expect("ok");
        assert_eq!(provider.inner().call_count(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let failing = FixedProvider::failing("catalog", ProviderError::Unavailable("down".into()));
        let provider = CachedProvider::new(failing, &CacheConfig::default());
        let ctx = QueryContext::with_budget(Duration::from_secs(1));
        let q = query("Lost Lake, Oregon", 45.4979, -121.8209);
        assert!(provider.query(&q, &ctx).await.is_err());
        assert!(provider.query(&q, &ctx).await.is_err());
        assert_eq!(provider.inner().call_count(), 2);
    }

    #[test]
    fn wrapper_keeps_inner_name() {
        let provider = CachedProvider::new(fixture(), &CacheConfig::default());
        assert_eq!(PoiProvider::name(&provider), "catalog");
    }
}
