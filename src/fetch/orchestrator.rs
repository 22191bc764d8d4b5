//! Fetch orchestrators
//!
//! Two entry points share the retry engine: a full fetch over the complete
//! active-player universe, and a retry-only fetch over a previously
//! persisted skip list. Either way the engine's output flows into the CSV
//! sink and the residual pending set into the skip-list store.

use crate::api::{PlayerId, StatsClient};
use crate::config::EnvConfig;
use crate::fetch::engine::{fetch_with_retry, FetchBatch, RetryPolicy};
use crate::fetch::progress::ProgressObserver;
use crate::output::{read_pending, write_pending, write_rows, WriteMode};
use crate::Result;
use std::path::Path;
use std::time::Duration;

/// The two kinds of per-player data this tool fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Most recent season of regular-season totals
    Stats,

    /// Listed position
    Positions,
}

impl FetchKind {
    /// Human-readable name, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            FetchKind::Stats => "stats",
            FetchKind::Positions => "positions",
        }
    }

    /// Output file path for this kind
    fn output_path<'a>(&self, config: &'a EnvConfig) -> &'a Path {
        match self {
            FetchKind::Stats => Path::new(&config.output_files.stats),
            FetchKind::Positions => Path::new(&config.output_files.positions),
        }
    }

    /// Skip file path for this kind
    fn skip_path<'a>(&self, config: &'a EnvConfig) -> &'a Path {
        match self {
            FetchKind::Stats => Path::new(&config.skipped_files.stats),
            FetchKind::Positions => Path::new(&config.skipped_files.positions),
        }
    }

    /// Projects one fetched payload into an output row
    ///
    /// Stats payloads already carry the player id as a column, so they pass
    /// through verbatim. Position payloads are the bare position string; the
    /// id is joined back in to match the two-column schema.
    fn project(&self, player_id: PlayerId, values: &[String]) -> Vec<String> {
        match self {
            FetchKind::Stats => values.to_vec(),
            FetchKind::Positions => {
                let mut row = Vec::with_capacity(values.len() + 1);
                row.push(player_id.to_string());
                row.extend(values.iter().cloned());
                row
            }
        }
    }
}

/// Runs the retry engine for one kind over the given ids
async fn fetch_kind(
    client: &StatsClient,
    kind: FetchKind,
    ids: &[PlayerId],
    policy: &RetryPolicy,
    progress: &mut dyn ProgressObserver,
) -> FetchBatch {
    match kind {
        FetchKind::Stats => {
            fetch_with_retry(ids, |id| client.fetch_last_season_stats(id), policy, progress).await
        }
        FetchKind::Positions => {
            fetch_with_retry(ids, |id| client.fetch_player_position(id), policy, progress).await
        }
    }
}

fn retry_policy(config: &EnvConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.api.max_retries,
        delay: Duration::from_millis(config.api.sleep_delay_ms),
    }
}

fn project_rows(kind: FetchKind, batch: &FetchBatch) -> Vec<Vec<String>> {
    batch
        .results
        .iter()
        .map(|(&id, values)| kind.project(id, values))
        .collect()
}

/// Fetches both kinds for the complete active-player universe
///
/// Output files are rewritten from scratch with a fresh header; a full
/// fetch replaces prior output rather than accumulating. Whatever is still
/// pending afterwards lands in the kind's skip file for a later
/// `--retry-skipped` run.
pub async fn run_full_fetch(
    client: &StatsClient,
    config: &EnvConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<()> {
    let ids = client.list_active_players(&config.api.season).await?;
    tracing::info!("Fetching {} active players", ids.len());

    for kind in [FetchKind::Stats, FetchKind::Positions] {
        run_fetch(client, kind, &ids, config, progress).await?;
    }

    Ok(())
}

/// One full-fetch pass for a single kind
async fn run_fetch(
    client: &StatsClient,
    kind: FetchKind,
    ids: &[PlayerId],
    config: &EnvConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<()> {
    let batch = fetch_kind(client, kind, ids, &retry_policy(config), progress).await;

    // No schema means no successes at all; leave prior output alone.
    if let Some(schema) = &batch.schema {
        let rows = project_rows(kind, &batch);
        write_rows(
            kind.output_path(config),
            &rows,
            WriteMode::Create,
            Some(schema.as_slice()),
        )?;
    }

    if batch.pending.is_empty() {
        tracing::info!("No skipped players for {}", kind.label());
    }
    write_pending(kind.skip_path(config), &batch.pending)?;

    Ok(())
}

/// Retries only the previously skipped players for one kind
///
/// Reads the kind's skip file; an empty pending set clears the file and
/// returns without touching the output or invoking the engine. Otherwise
/// fetched rows are appended to the existing output (no header) and the
/// skip file is rewritten with whatever remains.
pub async fn retry_skipped(
    client: &StatsClient,
    kind: FetchKind,
    config: &EnvConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<()> {
    let skip_path = kind.skip_path(config);
    let pending = read_pending(skip_path)?;

    if pending.is_empty() {
        tracing::info!("No skipped players found in {}", skip_path.display());
        write_pending(skip_path, &[])?;
        return Ok(());
    }

    tracing::info!(
        "Retrying {} skipped players for {}",
        pending.len(),
        kind.label()
    );

    let batch = fetch_kind(client, kind, &pending, &retry_policy(config), progress).await;

    let rows = project_rows(kind, &batch);
    write_rows(kind.output_path(config), &rows, WriteMode::Append, None)?;

    if batch.pending.is_empty() {
        tracing::info!(
            "All previously skipped players in {} were fetched successfully",
            skip_path.display()
        );
    }
    write_pending(skip_path, &batch.pending)?;

    Ok(())
}
