//! Live progress reporting
//!
//! Progress is a side channel, not a data flow: the engine notifies an
//! observer and moves on. The console implementation keeps the counter on
//! one line; tests plug in [`NullProgress`] or a recording observer.

use std::io::Write;

/// Observer for engine progress notifications
///
/// All methods have empty default bodies so an observer only implements
/// what it cares about.
pub trait ProgressObserver {
    /// Called at the start of each attempt round
    fn attempt_started(&mut self, _attempt: u32, _max_attempts: u32, _remaining: usize) {}

    /// Called after every attempted player, success or failure
    ///
    /// `fetched` counts cumulative successes for the whole run, `total` is
    /// the size of the original input set, `skipped` counts failures in the
    /// current round so far.
    fn player_done(&mut self, _fetched: usize, _total: usize, _skipped: usize) {}

    /// Called at the end of each attempt round
    fn attempt_finished(&mut self) {}
}

/// Console progress: an ephemeral single-line counter
///
/// Rewrites the same terminal line after every player, then commits it with
/// a newline when the round ends.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressObserver for ConsoleProgress {
    fn player_done(&mut self, fetched: usize, total: usize, skipped: usize) {
        print!("\rFetched {}/{} players, {} skipped...", fetched, total, skipped);
        let _ = std::io::stdout().flush();
    }

    fn attempt_finished(&mut self) {
        println!();
    }
}

/// Progress observer that ignores every notification
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {}
