//! The retry-with-partial-progress fetch engine and its orchestrators
//!
//! This module handles:
//! - Driving repeated fetch rounds over a shrinking pending set
//! - Reporting live progress to the console
//! - Wiring the engine to the API client, CSV sink, and skip-list store

mod engine;
mod orchestrator;
mod progress;

pub use engine::{fetch_with_retry, FetchBatch, RetryPolicy};
pub use orchestrator::{retry_skipped, run_full_fetch, FetchKind};
pub use progress::{ConsoleProgress, NullProgress, ProgressObserver};
