//! Discovery configuration with sensible defaults.
//!
//! [`DiscoveryConfig`] controls per-provider timeout budgets, the confidence
//! threshold used by the primary-first strategy, the integrity deny-list and
//! provider-private caching. It is passed explicitly to the orchestrator;
//! there is no process-wide configuration state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DiscoveryError;

/// Placeholder markers that must never reach users unnoticed.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    "Local Attraction",
    "Sample Location",
    "Mock",
    "Placeholder",
    "Demo Restaurant",
    "Historic Downtown",
    "Local Museum",
    "Test POI",
    "Example Attraction",
];

/// What the orchestrator does when the integrity guard finds a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Record violations on the result and return it anyway.
    #[default]
    ReportOnly,
    /// Fail the search with [`DiscoveryError::IntegrityViolation`].
    FailClosed,
}

/// Integrity guard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Case-insensitive substrings that mark placeholder content.
    pub deny_list: Vec<String>,
    pub policy: IntegrityPolicy,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            deny_list: DEFAULT_DENY_LIST.iter().map(|s| (*s).to_owned()).collect(),
            policy: IntegrityPolicy::ReportOnly,
        }
    }
}

/// Settings for [`crate::cache::CachedProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// How long a provider answer stays valid. Must be > 0 when enabled.
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300,
            max_entries: 100,
        }
    }
}

/// Configuration for the discovery orchestrator.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Deadline for the local inference provider, in milliseconds.
    pub primary_timeout_ms: u64,
    /// Deadline for the remote catalog provider, in milliseconds.
    pub secondary_timeout_ms: u64,
    /// Minimum primary confidence that lets primary-first skip the catalog.
    pub confidence_threshold: f64,
    pub integrity: IntegrityConfig,
    pub cache: CacheConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            primary_timeout_ms: 350,
            secondary_timeout_ms: 1000,
            confidence_threshold: 0.8,
            integrity: IntegrityConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms)
    }

    pub fn secondary_timeout(&self) -> Duration {
        Duration::from_millis(self.secondary_timeout_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both timeouts must be greater than 0
    /// - `confidence_threshold` must lie in `[0, 1]`
    /// - deny-list terms must not be blank
    /// - cache TTL and capacity must be greater than 0 when caching is enabled
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.primary_timeout_ms == 0 {
            return Err(DiscoveryError::Config(
                "primary_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.secondary_timeout_ms == 0 {
            return Err(DiscoveryError::Config(
                "secondary_timeout_ms must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DiscoveryError::Config(
                "confidence_threshold must be within [0, 1]".into(),
            ));
        }
        if self.integrity.deny_list.iter().any(|t| t.trim().is_empty()) {
            return Err(DiscoveryError::Config(
                "integrity deny_list must not contain blank terms".into(),
            ));
        }
        if self.cache.enabled && (self.cache.ttl_seconds == 0 || self.cache.max_entries == 0) {
            return Err(DiscoveryError::Config(
                "cache ttl_seconds and max_entries must be greater than 0 when enabled".into(),
            ));
        }
        Ok(())
    }
}
