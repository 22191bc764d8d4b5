//! Durable output: CSV record sink and skip-list store
//!
//! Two flat files per fetch kind are the only state that survives a run:
//! the CSV output holding fetched rows, and the skip list holding the
//! players a future `--retry-skipped` invocation should pick up.

mod csv;
mod skiplist;

pub use csv::{write_rows, OutputError, WriteMode};
pub use skiplist::{read_pending, write_pending, SkipListError};
