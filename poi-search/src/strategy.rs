//! Strategy selection: which providers run, and in what pattern.
//!
//! The selector is a pure function of the requested [`Strategy`] and, for
//! primary-first, the primary provider's answer. It keeps no state between
//! requests.

use crate::types::{ProviderResponse, Strategy};

/// How the orchestrator should invoke providers for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPlan {
    /// Run both providers concurrently and wait for both (or their deadlines).
    Concurrent,
    /// Run the primary; run the secondary only if [`StrategySelector::needs_secondary`] says so.
    PrimaryThenSecondary,
    /// Run the secondary alone.
    SecondaryOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySelector {
    confidence_threshold: f64,
}

impl StrategySelector {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn plan(&self, strategy: Strategy) -> ExecutionPlan {
        match strategy {
            Strategy::Hybrid => ExecutionPlan::Concurrent,
            Strategy::PrimaryFirst => ExecutionPlan::PrimaryThenSecondary,
            Strategy::SecondaryOnly => ExecutionPlan::SecondaryOnly,
        }
    }

    /// Decide whether primary-first must fall through to the catalog.
    ///
    /// The catalog is skipped only when the primary succeeded with at least
    /// one POI and a confidence at or above the threshold. A missing
    /// confidence counts as zero.
    pub fn needs_secondary(&self, primary: &ProviderResponse) -> bool {
        if !primary.is_ok() || primary.pois.is_empty() {
            return true;
        }
        primary.confidence.unwrap_or(0.0) < self.confidence_threshold
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new(0.8)
    }
}
