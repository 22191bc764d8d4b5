//! Upstream NBA stats API client
//!
//! This module handles all HTTP requests to stats.nba.com, including:
//! - Building an HTTP client with the headers the API requires
//! - Listing the active-player universe
//! - Per-player season-stats and position fetches
//! - Classifying per-player failures into data the retry engine consumes

mod client;

pub use client::{build_http_client, StatsClient, DEFAULT_BASE_URL};

use thiserror::Error;

/// Opaque identifier for one player, as issued by the upstream listing
pub type PlayerId = u64;

/// Result of one per-player fetch attempt
///
/// Per-player failure is data, not control flow: a fetch never returns an
/// error to its caller. `Absent` means the upstream answered but had nothing
/// for this player; `Transient` means the call itself failed and is worth
/// retrying. Both leave the player in the pending set.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Upstream returned data for this player
    Success {
        /// One output row's worth of field values
        values: Vec<String>,
        /// Column names matching `values` positionally (positions fetch
        /// reports its fixed two-column schema here)
        columns: Vec<String>,
    },

    /// Upstream answered, but with no data for this player
    Absent,

    /// The call failed (network, HTTP status, decode); retry may help
    Transient {
        /// Error description, for the warning log
        reason: String,
    },
}

/// Errors from API calls whose failure is fatal (the universe listing)
///
/// Per-player fetches never produce these; they classify their failures
/// into [`FetchOutcome::Transient`] instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Result set '{name}' missing from {endpoint} response")]
    MissingResultSet { endpoint: String, name: String },

    #[error("Column '{column}' missing from result set '{result_set}'")]
    MissingColumn { result_set: String, column: String },
}

/// Result type alias for API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;
