//! Hoopline: a patient NBA player-data fetcher
//!
//! This crate fetches per-player season statistics and position data from the
//! NBA stats API, persists results to CSV files, and tracks players that
//! failed to fetch so a later run can retry just those.

pub mod api;
pub mod config;
pub mod fetch;
pub mod output;

use thiserror::Error;

/// Main error type for Hoopline operations
#[derive(Debug, Error)]
pub enum HoopError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Skip list error: {0}")]
    SkipList(#[from] output::SkipListError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment '{0}' not found in config")]
    UnknownEnvironment(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Hoopline operations
pub type Result<T> = std::result::Result<T, HoopError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{FetchOutcome, PlayerId, StatsClient};
pub use config::EnvConfig;
pub use fetch::{fetch_with_retry, FetchBatch, FetchKind, RetryPolicy};
