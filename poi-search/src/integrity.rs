//! Placeholder-content detection over merged results.
//!
//! The guard only observes: it never removes or edits POIs. Whether a
//! non-empty report fails the search is decided by the orchestrator from
//! [`crate::config::IntegrityPolicy`].

use serde::{Deserialize, Serialize};

use crate::config::IntegrityConfig;
use crate::types::Poi;

/// One deny-list match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub poi_name: String,
    /// The deny-list term as configured (original casing).
    pub matched_term: String,
}

/// Result of scanning a POI list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
    pub pois_checked: usize,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Case-insensitive substring scanner over POI names.
#[derive(Debug, Clone)]
pub struct IntegrityGuard {
    /// `(original term, lowercased term)` pairs.
    terms: Vec<(String, String)>,
}

impl IntegrityGuard {
    pub fn new<I, S>(deny_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms = deny_list
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.trim().is_empty())
            .map(|t| {
                let lower = t.to_lowercase();
                (t, lower)
            })
            .collect();
        Self { terms }
    }

    pub fn from_config(config: &IntegrityConfig) -> Self {
        Self::new(config.deny_list.iter().cloned())
    }

    /// Record a violation for every (POI, term) pair where the POI name
    /// contains the term, ignoring case.
    pub fn scan(&self, pois: &[Poi]) -> IntegrityReport {
        let mut violations = Vec::new();
        for poi in pois {
            let name = poi.name.to_lowercase();
            for (term, lower) in &self.terms {
                if name.contains(lower.as_str()) {
                    violations.push(Violation {
                        poi_name: poi.name.clone(),
                        matched_term: term.clone(),
                    });
                }
            }
        }
        IntegrityReport {
            violations,
            pois_checked: pois.len(),
        }
    }
}

impl Default for IntegrityGuard {
    fn default() -> Self {
        Self::from_config(&IntegrityConfig::default())
    }
}
