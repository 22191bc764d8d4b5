//! HTTP client for stats.nba.com
//!
//! The stats API rejects anonymous clients, so the client sends the browser
//! headers the endpoints expect. Every endpoint answers with the same
//! envelope: a list of named result sets, each a `headers` array of column
//! names plus a `rowSet` array of rows.

use crate::api::{ApiError, ApiResult, FetchOutcome, PlayerId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Production base URL for the stats API
pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

const ALL_PLAYERS_RESULT_SET: &str = "CommonAllPlayers";
const CAREER_RESULT_SET: &str = "SeasonTotalsRegularSeason";
const PLAYER_INFO_RESULT_SET: &str = "CommonPlayerInfo";

/// Response envelope shared by every stats endpoint
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets")]
    result_sets: Vec<ResultSet>,
}

/// One named tabular result set within a response
#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Index of a named column, if present
    fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }
}

/// Builds an HTTP client configured for the stats API
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the stats API endpoints this tool consumes
pub struct StatsClient {
    http: Client,
    base_url: String,
}

impl StatsClient {
    /// Creates a client against the production API
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against an arbitrary base URL
    ///
    /// Used by tests to point the client at a mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists the identifiers of all players on a current roster
    ///
    /// This is the universe a full fetch operates over. Unlike the
    /// per-player fetches, a failure here is fatal: without the universe
    /// there is no batch to run.
    ///
    /// # Arguments
    ///
    /// * `season` - Season label the listing is scoped to (e.g. "2024-25")
    pub async fn list_active_players(&self, season: &str) -> ApiResult<Vec<PlayerId>> {
        let endpoint = "commonallplayers";
        let response = self
            .get_envelope(
                endpoint,
                &[
                    ("LeagueID", "00".to_string()),
                    ("Season", season.to_string()),
                    ("IsOnlyCurrentSeason", "1".to_string()),
                ],
            )
            .await?;

        let result_set = find_result_set(&response, endpoint, ALL_PLAYERS_RESULT_SET)?;
        let id_col = result_set.column_index("PERSON_ID").ok_or_else(|| {
            ApiError::MissingColumn {
                result_set: ALL_PLAYERS_RESULT_SET.to_string(),
                column: "PERSON_ID".to_string(),
            }
        })?;
        let roster_col =
            result_set
                .column_index("ROSTERSTATUS")
                .ok_or_else(|| ApiError::MissingColumn {
                    result_set: ALL_PLAYERS_RESULT_SET.to_string(),
                    column: "ROSTERSTATUS".to_string(),
                })?;

        let ids = result_set
            .row_set
            .iter()
            .filter(|row| row.get(roster_col).and_then(Value::as_u64) == Some(1))
            .filter_map(|row| row.get(id_col).and_then(Value::as_u64))
            .collect();

        Ok(ids)
    }

    /// Fetches a player's most recent season of regular-season totals
    ///
    /// Returns the last row of the career result set with its column names.
    /// A player with no recorded seasons is `Absent`; any transport or
    /// decode failure is `Transient`.
    pub async fn fetch_last_season_stats(&self, player_id: PlayerId) -> FetchOutcome {
        let result = self
            .get_envelope(
                "playercareerstats",
                &[
                    ("PlayerID", player_id.to_string()),
                    ("PerMode", "Totals".to_string()),
                    ("LeagueID", "00".to_string()),
                ],
            )
            .await
            .and_then(|response| {
                let result_set =
                    find_result_set(&response, "playercareerstats", CAREER_RESULT_SET)?;
                Ok(result_set.row_set.last().map(|row| FetchOutcome::Success {
                    values: row.iter().map(cell_to_string).collect(),
                    columns: result_set.headers.clone(),
                }))
            });

        classify(result, player_id, "stats")
    }

    /// Fetches a player's listed position
    ///
    /// The row is reported under the fixed `["PlayerID", "Position"]`
    /// schema; the caller joins the id back in when projecting the row.
    pub async fn fetch_player_position(&self, player_id: PlayerId) -> FetchOutcome {
        let result = self
            .get_envelope(
                "commonplayerinfo",
                &[
                    ("PlayerID", player_id.to_string()),
                    ("LeagueID", "00".to_string()),
                ],
            )
            .await
            .and_then(|response| {
                let result_set =
                    find_result_set(&response, "commonplayerinfo", PLAYER_INFO_RESULT_SET)?;
                let position_col = result_set.column_index("POSITION").ok_or_else(|| {
                    ApiError::MissingColumn {
                        result_set: PLAYER_INFO_RESULT_SET.to_string(),
                        column: "POSITION".to_string(),
                    }
                })?;

                let position = result_set
                    .row_set
                    .first()
                    .and_then(|row| row.get(position_col))
                    .map(cell_to_string)
                    .filter(|p| !p.is_empty());

                Ok(position.map(|position| FetchOutcome::Success {
                    values: vec![position],
                    columns: vec!["PlayerID".to_string(), "Position".to_string()],
                }))
            });

        classify(result, player_id, "position")
    }

    /// Sends one GET and decodes the response envelope
    async fn get_envelope(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<StatsResponse> {
        let url = format!("{}/stats/{}", self.base_url, endpoint);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<StatsResponse>().await?)
    }
}

/// Looks up a result set by name within a response envelope
fn find_result_set<'a>(
    response: &'a StatsResponse,
    endpoint: &str,
    name: &str,
) -> ApiResult<&'a ResultSet> {
    response
        .result_sets
        .iter()
        .find(|rs| rs.name == name)
        .ok_or_else(|| ApiError::MissingResultSet {
            endpoint: endpoint.to_string(),
            name: name.to_string(),
        })
}

/// Collapses a per-player fetch result into a `FetchOutcome`
///
/// `Ok(None)` means the upstream answered with no data. Errors are logged
/// and absorbed as `Transient`; the retry engine decides what happens next.
fn classify(
    result: ApiResult<Option<FetchOutcome>>,
    player_id: PlayerId,
    kind: &str,
) -> FetchOutcome {
    match result {
        Ok(Some(outcome)) => outcome,
        Ok(None) => FetchOutcome::Absent,
        Err(e) => {
            tracing::warn!("Error fetching {} for player {}: {}", kind, player_id, e);
            FetchOutcome::Transient {
                reason: e.to_string(),
            }
        }
    }
}

/// Renders one JSON cell as a CSV field
///
/// Strings pass through unquoted, null becomes empty, everything else keeps
/// its JSON rendering (integers stay integers, floats keep their point).
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = StatsClient::with_base_url("http://localhost:9999/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_cell_to_string_variants() {
        assert_eq!(cell_to_string(&json!(null)), "");
        assert_eq!(cell_to_string(&json!("Guard")), "Guard");
        assert_eq!(cell_to_string(&json!(203999)), "203999");
        assert_eq!(cell_to_string(&json!(0.512)), "0.512");
    }

    #[test]
    fn test_envelope_deserializes() {
        let raw = r#"{
            "resource": "playercareerstats",
            "resultSets": [{
                "name": "SeasonTotalsRegularSeason",
                "headers": ["PLAYER_ID", "SEASON_ID", "PTS"],
                "rowSet": [[203999, "2023-24", 2085], [203999, "2024-25", 1900]]
            }]
        }"#;

        let response: StatsResponse = serde_json::from_str(raw).unwrap();
        let rs = find_result_set(&response, "playercareerstats", CAREER_RESULT_SET).unwrap();
        assert_eq!(rs.headers.len(), 3);
        assert_eq!(rs.row_set.len(), 2);
        assert_eq!(rs.column_index("PTS"), Some(2));
    }

    #[test]
    fn test_find_result_set_missing() {
        let response: StatsResponse =
            serde_json::from_str(r#"{"resultSets": []}"#).unwrap();
        let err = find_result_set(&response, "commonplayerinfo", PLAYER_INFO_RESULT_SET)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingResultSet { .. }));
    }
}
