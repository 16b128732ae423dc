//! Roadtrip: point-of-interest discovery host.
//!
//! This crate wires the `poi-search` discovery core into a runnable
//! application: TOML configuration, fixture-backed demo providers and a
//! text report.
//!
//! # Architecture
//!
//! Discovery is a two-source pipeline driven by `poi-search`:
//! Request → Strategy → (Local inference ∥ Remote catalog) → Merge → Integrity → Result
//! - **config**: [`AppConfig`] wraps the discovery settings and demo simulation
//! - **fixtures**: JSON POI fixtures served through fixed providers
//! - **report**: terminal rendering of a [`poi_search::SearchResult`]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod report;

pub use config::{AppConfig, DemoConfig, LatencyRange};
pub use error::{AppError, Result};
