//! Core discovery orchestrator: strategy dispatch, timed fan-out, merge, guard.
//!
//! One [`Orchestrator`] owns a primary (local inference) provider, a
//! secondary (remote catalog) provider and the discovery configuration. Each
//! call to [`Orchestrator::search`] is independent; nothing carries over
//! between requests.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::{DiscoveryConfig, IntegrityPolicy};
use crate::error::{DiscoveryError, ProviderError, Result};
use crate::integrity::IntegrityGuard;
use crate::provider::{PoiProvider, QueryContext};
use crate::strategy::{ExecutionPlan, StrategySelector};
use crate::types::{
    normalize_category, ProviderKind, ProviderQuery, ProviderResponse, ProviderTiming,
    SearchRequest, SearchResult, SearchTiming,
};

use super::merge::merge_results;

/// Lifecycle of one search request.
///
/// `Received → StrategyChosen → ProvidersInvoked → Merged → Guarded →
/// Completed`, or `Received → Rejected` for a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Received,
    StrategyChosen,
    ProvidersInvoked,
    Merged,
    Guarded,
    Completed,
    Rejected,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::StrategyChosen => "strategy_chosen",
            Self::ProvidersInvoked => "providers_invoked",
            Self::Merged => "merged",
            Self::Guarded => "guarded",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

fn advance(phase: &mut SearchPhase, next: SearchPhase) {
    tracing::debug!(from = %phase, to = %next, "search phase");
    *phase = next;
}

/// Multi-source POI discovery over a primary and a secondary provider.
pub struct Orchestrator<P, S> {
    primary: P,
    secondary: S,
    config: DiscoveryConfig,
    selector: StrategySelector,
    guard: IntegrityGuard,
}

impl<P: PoiProvider, S: PoiProvider> Orchestrator<P, S> {
    /// Build an orchestrator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Config`] if the configuration is invalid.
    pub fn new(primary: P, secondary: S, config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            primary,
            secondary,
            selector: StrategySelector::new(config.confidence_threshold),
            guard: IntegrityGuard::from_config(&config.integrity),
            config,
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Run one discovery request.
    ///
    /// # Pipeline
    ///
    /// 1. Validate the request; reject it before any provider is called
    /// 2. Pick the execution plan for the requested strategy
    /// 3. Invoke providers under their own deadlines (concurrently for
    ///    hybrid, sequentially for primary-first, catalog alone for
    ///    secondary-only)
    /// 4. Merge the available lists: primary-wins dedup, rank, truncate
    /// 5. Scan merged names against the integrity deny-list
    /// 6. Assemble the result with per-provider diagnostics and timing
    ///
    /// Provider failures never fail the search; a provider that errors or
    /// times out contributes an empty list and its error is recorded in its
    /// response slot. If both fail the result is empty but `Ok`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::RequestInvalid`] for a blank location, missing or
    ///   out-of-range origin, or `max_results == 0`
    /// - [`DiscoveryError::IntegrityViolation`] when the merged results hit
    ///   the deny-list and the policy is [`IntegrityPolicy::FailClosed`]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let started = Instant::now();
        let mut phase = SearchPhase::Received;

        let query = match validate_request(request) {
            Ok(query) => query,
            Err(err) => {
                advance(&mut phase, SearchPhase::Rejected);
                tracing::debug!(error = %err, "search request rejected");
                return Err(err);
            }
        };
        tracing::trace!(location = %query.location_name, origin = %query.origin, "search received");

        let plan = self.selector.plan(request.strategy);
        advance(&mut phase, SearchPhase::StrategyChosen);

        let (primary_response, secondary_response) = match plan {
            ExecutionPlan::Concurrent => {
                let (primary, secondary) =
                    futures::future::join(self.invoke_primary(&query), self.invoke_secondary(&query))
                        .await;
                (Some(primary), Some(secondary))
            }
            ExecutionPlan::PrimaryThenSecondary => {
                let primary = self.invoke_primary(&query).await;
                let secondary = if self.selector.needs_secondary(&primary) {
                    Some(self.invoke_secondary(&query).await)
                } else {
                    tracing::debug!(
                        confidence = primary.confidence.unwrap_or(0.0),
                        count = primary.pois.len(),
                        "primary confident, skipping secondary"
                    );
                    None
                };
                (Some(primary), secondary)
            }
            ExecutionPlan::SecondaryOnly => (None, Some(self.invoke_secondary(&query).await)),
        };
        advance(&mut phase, SearchPhase::ProvidersInvoked);

        let merged = merge_results(
            pois_of(primary_response.as_ref()),
            pois_of(secondary_response.as_ref()),
            request.max_results,
        );
        advance(&mut phase, SearchPhase::Merged);

        let integrity_report = self.guard.scan(&merged);
        advance(&mut phase, SearchPhase::Guarded);

        if !integrity_report.is_clean() {
            tracing::warn!(
                violations = integrity_report.violations.len(),
                policy = ?self.config.integrity.policy,
                "placeholder content in merged results"
            );
            if self.config.integrity.policy == IntegrityPolicy::FailClosed {
                return Err(DiscoveryError::IntegrityViolation(integrity_report));
            }
        }

        let total_ms = elapsed_millis(started);
        let timing = SearchTiming {
            primary: primary_response.as_ref().map(timing_of),
            secondary: secondary_response.as_ref().map(timing_of),
            total_ms,
        };

        if total_ms > self.config.secondary_timeout_ms {
            tracing::warn!(
                total_ms,
                budget_ms = self.config.secondary_timeout_ms,
                strategy = %request.strategy,
                "slow discovery"
            );
        } else {
            tracing::info!(
                total_ms,
                strategy = %request.strategy,
                count = merged.len(),
                "discovery complete"
            );
        }
        advance(&mut phase, SearchPhase::Completed);

        Ok(SearchResult {
            location: request.location_name.clone(),
            strategy_used: request.strategy,
            primary_response,
            secondary_response,
            merged_results: merged,
            timing,
            integrity_report,
        })
    }

    async fn invoke_primary(&self, query: &ProviderQuery) -> ProviderResponse {
        invoke(
            &self.primary,
            ProviderKind::Primary,
            query,
            self.config.primary_timeout(),
        )
        .await
    }

    async fn invoke_secondary(&self, query: &ProviderQuery) -> ProviderResponse {
        invoke(
            &self.secondary,
            ProviderKind::Secondary,
            query,
            self.config.secondary_timeout(),
        )
        .await
    }
}

/// Check a request and derive the query every provider receives.
fn validate_request(request: &SearchRequest) -> Result<ProviderQuery> {
    let location_name = request.location_name.trim();
    if location_name.is_empty() {
        return Err(DiscoveryError::RequestInvalid(
            "location name must not be blank".into(),
        ));
    }

    let origin = request
        .origin
        .ok_or_else(|| DiscoveryError::RequestInvalid("origin coordinates are required".into()))?;
    if !origin.is_valid() {
        return Err(DiscoveryError::RequestInvalid(format!(
            "origin coordinates out of range: {origin}"
        )));
    }

    if request.max_results == 0 {
        return Err(DiscoveryError::RequestInvalid(
            "max_results must be at least 1".into(),
        ));
    }

    let category = request
        .category
        .as_deref()
        .map(normalize_category)
        .filter(|c| !c.is_empty());

    Ok(ProviderQuery {
        location_name: location_name.to_owned(),
        origin,
        category,
        limit: request.max_results,
    })
}

/// Call one provider under `budget`, turning every outcome into a response.
///
/// The future is dropped and the context cancelled once the budget elapses,
/// so a stuck provider cannot hold the search open.
async fn invoke<T: PoiProvider>(
    provider: &T,
    kind: ProviderKind,
    query: &ProviderQuery,
    budget: Duration,
) -> ProviderResponse {
    let ctx = QueryContext::with_budget(budget);
    let started = Instant::now();

    let outcome = match tokio::time::timeout(budget, provider.query(query, &ctx)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            ctx.cancel();
            Err(ProviderError::Timeout(format!(
                "exceeded {}ms budget",
                budget.as_millis()
            )))
        }
    };
    let elapsed_ms = elapsed_millis(started);

    match &outcome {
        Ok(output) => tracing::debug!(
            provider = %kind,
            name = provider.name(),
            count = output.pois.len(),
            elapsed_ms,
            "provider returned results"
        ),
        Err(err) => tracing::warn!(
            provider = %kind,
            name = provider.name(),
            error = %err,
            elapsed_ms,
            "provider query failed"
        ),
    }

    ProviderResponse::from_outcome(kind, outcome, elapsed_ms)
}

fn pois_of(response: Option<&ProviderResponse>) -> Vec<crate::types::Poi> {
    response.map(|r| r.pois.clone()).unwrap_or_default()
}

fn timing_of(response: &ProviderResponse) -> ProviderTiming {
    ProviderTiming {
        elapsed_ms: response.elapsed_ms,
        status: response.status(),
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::SimulatedLatency;
    use crate::providers::FixedProvider;
    use crate::types::{Coordinates, Poi, ProviderStatus, Strategy};

    fn origin() -> Coordinates {
        Coordinates::new(45.4979, -121.8209)
    }

    fn make_poi(id: &str, name: &str, rating: f64, distance: f64) -> Poi {
        Poi::new(id, name, "attraction", origin(), distance, rating)
    }

    fn request(strategy: Strategy) -> SearchRequest {
        SearchRequest::new("Lost Lake, Oregon", origin(), 8).with_strategy(strategy)
    }

    fn local(confidence: f64) -> FixedProvider {
        FixedProvider::new(
            "local",
            vec![
                make_poi("local:resort", "Lost Lake Resort", 4.2, 0.2),
                make_poi("local:trail", "Lost Lake Trail #16", 4.7, 0.5),
            ],
        )
        .with_confidence(confidence)
    }

    fn catalog() -> FixedProvider {
        FixedProvider::new(
            "catalog",
            vec![
                make_poi("ChIJresort", "Lost Lake Resort", 4.1, 0.3),
                make_poi("ChIJvalley", "Hood River Valley", 4.5, 12.7),
            ],
        )
    }

    #[test]
    fn phase_display() {
        assert_eq!(SearchPhase::ProvidersInvoked.to_string(), "providers_invoked");
        assert_eq!(SearchPhase::Rejected.to_string(), "rejected");
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = DiscoveryConfig {
            confidence_threshold: 1.5,
            ..DiscoveryConfig::default()
        };
        let result = Orchestrator::new(local(0.9), catalog(), config);
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }

    #[test]
    fn validate_request_normalises_category() {
        let req = request(Strategy::Hybrid).with_category("  Lodging ");
        let query = validate_request(&req).expect("valid");
        assert_eq!(query.category.as_deref(), Some("lodging"));
        assert_eq!(query.limit, 8);
    }

    #[test]
    fn validate_request_drops_blank_category() {
        let req = request(Strategy::Hybrid).with_category("   ");
        let query = validate_request(&req).expect("valid");
        assert!(query.category.is_none());
    }

    #[test]
    fn validate_request_rejects_bad_input() {
        let mut blank = request(Strategy::Hybrid);
        blank.location_name = "  ".into();
        assert!(matches!(validate_request(&blank), Err(DiscoveryError::RequestInvalid(_))));

        let mut missing = request(Strategy::Hybrid);
        missing.origin = None;
        assert!(matches!(validate_request(&missing), Err(DiscoveryError::RequestInvalid(_))));

        let mut out_of_range = request(Strategy::Hybrid);
        out_of_range.origin = Some(Coordinates::new(91.0, 0.0));
        assert!(matches!(
            validate_request(&out_of_range),
            Err(DiscoveryError::RequestInvalid(_))
        ));

        let mut zero = request(Strategy::Hybrid);
        zero.max_results = 0;
        assert!(matches!(validate_request(&zero), Err(DiscoveryError::RequestInvalid(_))));
    }

    #[tokio::test]
    async fn hybrid_calls_both_and_merges() {
        let orchestrator =
            Orchestrator::new(local(0.9), catalog(), DiscoveryConfig::default()).expect("config");
        let result = orchestrator.search(&request(Strategy::Hybrid)).await.expect("search");

        assert_eq!(result.strategy_used, Strategy::Hybrid);
        assert_eq!(result.merged_results.len(), 3);
        assert_eq!(orchestrator.primary().call_count(), 1);
        assert_eq!(orchestrator.secondary().call_count(), 1);
        assert_eq!(
            result.timing.primary.map(|t| t.status),
            Some(ProviderStatus::Ok)
        );
        assert!(result.integrity_report.is_clean());
    }

    #[tokio::test]
    async fn primary_first_skips_secondary_when_confident() {
        let orchestrator =
            Orchestrator::new(local(0.9), catalog(), DiscoveryConfig::default()).expect("config");
        let result = orchestrator
            .search(&request(Strategy::PrimaryFirst))
            .await
            .expect("search");

        assert!(result.secondary_response.is_none());
        assert!(result.timing.secondary.is_none());
        assert_eq!(orchestrator.secondary().call_count(), 0);
        assert_eq!(result.merged_results.len(), 2);
    }

    #[tokio::test]
    async fn primary_first_falls_back_below_threshold() {
        let orchestrator =
            Orchestrator::new(local(0.5), catalog(), DiscoveryConfig::default()).expect("config");
        let result = orchestrator
            .search(&request(Strategy::PrimaryFirst))
            .await
            .expect("search");

        assert!(result.secondary_response.is_some());
        assert_eq!(orchestrator.secondary().call_count(), 1);
        assert_eq!(result.merged_results.len(), 3);
    }

    #[tokio::test]
    async fn secondary_only_never_calls_primary() {
        let orchestrator =
            Orchestrator::new(local(0.9), catalog(), DiscoveryConfig::default()).expect("config");
        let result = orchestrator
            .search(&request(Strategy::SecondaryOnly))
            .await
            .expect("search");

        assert!(result.primary_response.is_none());
        assert_eq!(orchestrator.primary().call_count(), 0);
        assert_eq!(result.merged_results[0].name, "Hood River Valley");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_primary_is_cut_at_budget() {
        let slow = local(0.9).with_latency(SimulatedLatency::fixed(2_000));
        let orchestrator =
            Orchestrator::new(slow, catalog(), DiscoveryConfig::default()).expect("config");
        let result = orchestrator.search(&request(Strategy::Hybrid)).await.expect("search");

        let primary = result.primary_response.expect("primary slot");
        assert_eq!(primary.status(), ProviderStatus::Timeout);
        assert!(primary.pois.is_empty());
        assert!(primary.elapsed_ms <= 360, "elapsed {}", primary.elapsed_ms);
        assert_eq!(result.merged_results.len(), 2);
    }

    #[tokio::test]
    async fn both_failing_is_empty_success() {
        let orchestrator = Orchestrator::new(
            FixedProvider::failing("local", ProviderError::Unavailable("model not loaded".into())),
            FixedProvider::failing("catalog", ProviderError::Unavailable("offline".into())),
            DiscoveryConfig::default(),
        )
        .expect("config");
        let result = orchestrator.search(&request(Strategy::Hybrid)).await.expect("search");

        assert!(result.merged_results.is_empty());
        assert_eq!(
            result.timing.primary.map(|t| t.status),
            Some(ProviderStatus::Unavailable)
        );
        assert_eq!(
            result.timing.secondary.map(|t| t.status),
            Some(ProviderStatus::Unavailable)
        );
    }

    #[tokio::test]
    async fn fail_closed_policy_returns_error() {
        let mut config = DiscoveryConfig::default();
        config.integrity.policy = IntegrityPolicy::FailClosed;
        let primary = FixedProvider::new(
            "local",
            vec![make_poi("local:mock", "Mock Diner", 4.0, 1.0)],
        );
        let orchestrator = Orchestrator::new(primary, catalog(), config).expect("config");

        match orchestrator.search(&request(Strategy::Hybrid)).await {
            Err(DiscoveryError::IntegrityViolation(report)) => {
                assert_eq!(report.violations.len(), 1);
                assert_eq!(report.violations[0].matched_term, "Mock");
            }
            other => panic!("expected integrity violation, got {other:?}"),
        }
    }
}
