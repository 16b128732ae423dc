//! Fixed-list provider: serves a supplied POI list with simulated latency.
//!
//! Stands in for a real source in demos and tests. The POI data always comes
//! from the caller (fixture files, test code); nothing is built in.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ProviderError;
use crate::latency::SimulatedLatency;
use crate::provider::{PoiProvider, QueryContext};
use crate::types::{Poi, ProviderOutput, ProviderQuery};

use super::validate_pois;

/// A provider that answers every query with the same POIs.
#[derive(Debug)]
pub struct FixedProvider {
    name: String,
    pois: Vec<Poi>,
    confidence: Option<f64>,
    latency: Option<SimulatedLatency>,
    failure: Option<ProviderError>,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(name: impl Into<String>, pois: Vec<Poi>) -> Self {
        Self {
            name: name.into(),
            pois,
            confidence: None,
            latency: None,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that always fails with `error` (after any simulated latency).
    pub fn failing(name: impl Into<String>, error: ProviderError) -> Self {
        let mut provider = Self::new(name, Vec::new());
        provider.failure = Some(error);
        provider
    }

    /// Report this confidence alongside every answer.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_latency(mut self, latency: SimulatedLatency) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of times [`PoiProvider::query`] has been entered.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PoiProvider for FixedProvider {
    async fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> Result<ProviderOutput, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = &self.latency {
            let delay = latency.next_delay();
            ctx.guard(async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        }

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let mut pois: Vec<Poi> = self
            .pois
            .iter()
            .filter(|poi| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|category| poi.category == category)
            })
            .cloned()
            .collect();
        pois.truncate(query.limit);
        validate_pois(&pois)?;

        Ok(ProviderOutput {
            pois,
            confidence: self.confidence,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
