use serde::Deserialize;
use std::collections::HashMap;

/// Top-level configuration file structure
///
/// Holds one [`EnvConfig`] per named environment. Environment selection
/// happens at load time; the rest of the program only ever sees the one
/// selected [`EnvConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub environments: HashMap<String, EnvConfig>,
}

/// Configuration for one environment
#[derive(Debug, Clone, Deserialize)]
pub struct EnvConfig {
    /// CSV destinations for fetched data
    #[serde(rename = "output-files")]
    pub output_files: FileTargets,

    /// Skip-list files holding players still pending after a run
    #[serde(rename = "skipped-files")]
    pub skipped_files: FileTargets,

    pub api: ApiConfig,

    pub logging: LoggingConfig,
}

/// One file path per fetch kind
#[derive(Debug, Clone, Deserialize)]
pub struct FileTargets {
    /// Path used by the season-stats fetch
    pub stats: String,

    /// Path used by the position fetch
    pub positions: String,
}

/// Upstream API pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Courtesy delay between consecutive API calls (milliseconds)
    #[serde(rename = "sleep-delay-ms")]
    pub sleep_delay_ms: u64,

    /// Maximum number of fetch rounds over the pending set
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Season label the active-player listing is scoped to (e.g. "2024-25")
    pub season: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: one of trace, debug, info, warn, error
    pub level: String,

    /// Path to the log file (always written; console output is dev-only)
    pub file: String,
}
