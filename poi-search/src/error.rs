//! Error types for the poi-search crate.
//!
//! Only [`DiscoveryError`] ever reaches the caller of a search. Provider
//! failures are [`ProviderError`] values that the orchestrator absorbs and
//! records on the result instead of propagating.

use serde::{Deserialize, Serialize};

use crate::integrity::IntegrityReport;

/// Failure of a single provider call.
///
/// Serialised as `{"kind": "...", "message": "..."}` so it can travel inside
/// a [`crate::types::SearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ProviderError {
    /// The provider could not be reached or initialised.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider did not answer within its deadline, or was cancelled.
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// The provider answered with data that could not be interpreted.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short machine-friendly label for this failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Errors returned by [`crate::Orchestrator::search`].
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The request was malformed and no provider was called.
    #[error("invalid request: {0}")]
    RequestInvalid(String),

    /// The merged results contained placeholder content and the integrity
    /// policy is fail-closed.
    #[error("integrity violation: {} placeholder match(es) in results", .0.violations.len())]
    IntegrityViolation(IntegrityReport),

    /// Invalid discovery configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for poi-search results.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::Violation;

    #[test]
    fn display_provider_errors() {
        assert_eq!(
            ProviderError::Unavailable("model not loaded".into()).to_string(),
            "provider unavailable: model not loaded"
        );
        assert_eq!(
            ProviderError::Timeout("exceeded 350ms".into()).to_string(),
            "provider timed out: exceeded 350ms"
        );
        assert_eq!(
            ProviderError::InvalidResponse("rating 7.5".into()).to_string(),
            "invalid provider response: rating 7.5"
        );
    }

    #[test]
    fn provider_error_kind_labels() {
        assert_eq!(ProviderError::Unavailable(String::new()).kind(), "unavailable");
        assert_eq!(ProviderError::Timeout(String::new()).kind(), "timeout");
        assert_eq!(
            ProviderError::InvalidResponse(String::new()).kind(),
            "invalid_response"
        );
    }

    #[test]
    fn provider_error_serialises_with_kind_tag() {
        let json = serde_json::to_value(ProviderError::Timeout("late".into())).expect("serialize");
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["message"], "late");
    }

    #[test]
    fn display_request_invalid() {
        let err = DiscoveryError::RequestInvalid("max_results must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "invalid request: max_results must be greater than 0"
        );
    }

    #[test]
    fn display_integrity_violation_counts_matches() {
        let report = IntegrityReport {
            violations: vec![Violation {
                poi_name: "Mock Diner".into(),
                matched_term: "Mock".into(),
            }],
            pois_checked: 3,
        };
        let err = DiscoveryError::IntegrityViolation(report);
        assert_eq!(
            err.to_string(),
            "integrity violation: 1 placeholder match(es) in results"
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiscoveryError>();
        assert_send_sync::<ProviderError>();
    }
}
