//! Host configuration: discovery settings plus demo provider simulation.
//!
//! Stored as TOML, by default at `~/.config/roadtrip/config.toml`:
//!
//! ```toml
//! [discovery]
//! primary_timeout_ms = 350
//! secondary_timeout_ms = 1000
//! confidence_threshold = 0.8
//!
//! [discovery.integrity]
//! policy = "report_only"
//!
//! [demo.primary_latency]
//! min_ms = 200
//! max_ms = 400
//! ```

use std::path::PathBuf;

use poi_search::{DiscoveryConfig, DiscoveryError, SimulatedLatency};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub discovery: DiscoveryConfig,
    pub demo: DemoConfig,
}

/// Inclusive latency range for a simulated provider, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Build a simulator for this range; seeded when `seed` is given.
    pub fn simulator(&self, seed: Option<u64>) -> SimulatedLatency {
        match seed {
            Some(seed) => SimulatedLatency::seeded(self.min_ms, self.max_ms, seed),
            None => SimulatedLatency::random(self.min_ms, self.max_ms),
        }
    }
}

/// Settings for the fixture-backed demo providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Confidence the primary fixture reports.
    pub primary_confidence: f64,
    /// Seed for latency simulation; random when unset.
    pub seed: Option<u64>,
    /// Simulated on-device inference latency.
    pub primary_latency: LatencyRange,
    /// Simulated catalog round-trip latency.
    pub secondary_latency: LatencyRange,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            primary_confidence: 0.85,
            seed: None,
            primary_latency: LatencyRange::new(200, 400),
            secondary_latency: LatencyRange::new(500, 1200),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/roadtrip/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("roadtrip").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("roadtrip")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/roadtrip-config/config.toml")
        }
    }

    /// Validate discovery settings and the demo section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.discovery.validate().map_err(|e| match e {
            DiscoveryError::Config(msg) => AppError::Config(format!("discovery: {msg}")),
            other => AppError::Discovery(other),
        })?;
        if !(0.0..=1.0).contains(&self.demo.primary_confidence) {
            return Err(AppError::Config(
                "demo.primary_confidence must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use poi_search::IntegrityPolicy;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discovery.primary_timeout_ms, 350);
        assert_eq!(config.demo.primary_latency, LatencyRange::new(200, 400));
        assert!(config.demo.seed.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.discovery.integrity.policy = IntegrityPolicy::FailClosed;
        config.demo.seed = Some(42);
        config.save_to_file(&path).expect("save");

        let loaded = AppConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [discovery]
            primary_timeout_ms = 500

            [demo]
            seed = 7
            "#,
        )
        .expect("parse");
        assert_eq!(config.discovery.primary_timeout_ms, 500);
        assert_eq!(config.discovery.secondary_timeout_ms, 1000);
        assert_eq!(config.demo.seed, Some(7));
        assert!((config.demo.primary_confidence - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = AppConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = AppConfig::from_file(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = AppConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("roadtrip"));
    }

    #[test]
    fn validate_rejects_bad_discovery_settings() {
        let mut config = AppConfig::default();
        config.discovery.secondary_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_demo_confidence() {
        let mut config = AppConfig::default();
        config.demo.primary_confidence = 1.2;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn seeded_simulator_uses_range() {
        let sim = LatencyRange::new(200, 400).simulator(Some(1));
        assert_eq!(sim.range_ms(), (200, 400));
        let delay = sim.next_delay().as_millis();
        assert!((200..=400).contains(&delay));
    }
}
