//! Skip-list store
//!
//! A skip list is the durable form of the pending set: the players a run
//! failed to fetch, one per line under a `PlayerID` header, waiting for a
//! `--retry-skipped` invocation. An absent file and an empty file both mean
//! "nothing pending"; an empty file is additionally the signal that a prior
//! pending set was fully resolved.

use crate::api::PlayerId;
use crate::output::csv::{write_rows, OutputError, WriteMode};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

const HEADER: &str = "PlayerID";

/// Errors that can occur reading or writing a skip list
#[derive(Debug, Error)]
pub enum SkipListError {
    #[error("Failed to read skip file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A non-blank, non-header line that does not parse as a player id.
    /// Deliberately fatal: a corrupt skip file should be looked at, not
    /// silently shortened.
    #[error("Malformed line {line} in skip file {path}: '{content}'")]
    MalformedLine {
        path: String,
        line: usize,
        content: String,
    },

    #[error(transparent)]
    Write(#[from] OutputError),
}

/// Result type for skip-list operations
pub type SkipListResult<T> = Result<T, SkipListError>;

/// Reads the pending player ids from a skip file
///
/// A missing file reads as an empty pending set. Blank lines and the
/// `PlayerID` header line are skipped; any other non-integer line is a
/// [`SkipListError::MalformedLine`].
pub fn read_pending(path: &Path) -> SkipListResult<Vec<PlayerId>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No skip file found: {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(SkipListError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let mut ids = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line == HEADER {
            continue;
        }
        let id = line
            .parse::<PlayerId>()
            .map_err(|_| SkipListError::MalformedLine {
                path: path.display().to_string(),
                line: idx + 1,
                content: line.to_string(),
            })?;
        ids.push(id);
    }

    Ok(ids)
}

/// Writes the pending player ids to a skip file
///
/// An empty pending set truncates the file to zero bytes rather than
/// deleting it; the empty file records that everything resolved. A
/// non-empty set rewrites the file from scratch with the `PlayerID` header.
pub fn write_pending(path: &Path, ids: &[PlayerId]) -> SkipListResult<()> {
    if ids.is_empty() {
        File::create(path).map_err(|e| SkipListError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::info!("Cleared skip file {}", path.display());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ids.iter().map(|id| vec![id.to_string()]).collect();
    let header = [HEADER.to_string()];
    write_rows(path, &rows, WriteMode::Create, Some(&header[..]))?;
    Ok(())
}
