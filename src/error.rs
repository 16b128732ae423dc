//! Error types for the roadtrip host.

/// Top-level error type for the host application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file could not be parsed, serialised or validated.
    #[error("config error: {0}")]
    Config(String),

    /// A POI fixture file is malformed.
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Discovery failed (invalid request, config or integrity violation).
    #[error(transparent)]
    Discovery(#[from] poi_search::DiscoveryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
