//! CSV record sink

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing rows
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for sink operations
pub type OutputResult<T> = Result<T, OutputError>;

/// How the sink opens the destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate or create the file; the header (if any) is written first
    Create,

    /// Append to existing content; no header is ever written
    Append,
}

/// Writes rows to a CSV file
///
/// Calling with zero rows is a no-op: the file is neither created nor
/// truncated, so a run that fetched nothing leaves prior output intact.
/// In `Append` mode the header argument is ignored even when supplied.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `rows` - Data rows, one `Vec<String>` per output line
/// * `mode` - Create (truncate, header first) or Append
/// * `header` - Column names, written only in `Create` mode
pub fn write_rows(
    path: &Path,
    rows: &[Vec<String>],
    mode: WriteMode,
    header: Option<&[String]>,
) -> OutputResult<()> {
    if rows.is_empty() {
        tracing::info!("Nothing to write for {}, skipping", path.display());
        return Ok(());
    }

    let wrap = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = match mode {
        WriteMode::Create => File::create(path).map_err(wrap)?,
        WriteMode::Append => OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(wrap)?,
    };
    let mut out = BufWriter::new(file);

    if mode == WriteMode::Create {
        if let Some(columns) = header {
            write_row(&mut out, columns).map_err(wrap)?;
        }
    }

    for row in rows {
        write_row(&mut out, row).map_err(wrap)?;
    }
    out.flush().map_err(wrap)?;

    tracing::info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Writes a single CSV row to any writer
fn write_row<W: Write>(mut w: W, row: &[String]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&["PLAYER_ID", "PTS"])
    }

    #[test]
    fn test_create_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(
            &path,
            &[row(&["1", "20"]), row(&["2", "31"])],
            WriteMode::Create,
            Some(header().as_slice()),
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "PLAYER_ID,PTS\n1,20\n2,31\n");
    }

    #[test]
    fn test_append_never_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[row(&["1", "20"])], WriteMode::Create, Some(header().as_slice())).unwrap();
        write_rows(&path, &[row(&["2", "31"])], WriteMode::Append, Some(header().as_slice())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "PLAYER_ID,PTS\n1,20\n2,31\n");
    }

    #[test]
    fn test_empty_rows_leave_existing_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[row(&["1", "20"])], WriteMode::Create, Some(header().as_slice())).unwrap();
        write_rows(&path, &[], WriteMode::Create, Some(header().as_slice())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "PLAYER_ID,PTS\n1,20\n");
    }

    #[test]
    fn test_empty_rows_create_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[], WriteMode::Create, Some(header().as_slice())).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_create_without_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[row(&["1", "20"])], WriteMode::Create, None).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,20\n");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(
            &path,
            &[row(&["Curry, Stephen", "says \"hi\"", "plain"])],
            WriteMode::Create,
            None,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"Curry, Stephen\",\"says \"\"hi\"\"\",plain\n");
    }

    #[test]
    fn test_append_to_missing_file_creates_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[row(&["9", "3"])], WriteMode::Append, None).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "9,3\n");
    }
}
