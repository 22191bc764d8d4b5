//! Retry engine
//!
//! Drives repeated fetch rounds over a working set of player ids, shrinking
//! the pending set each round and merging successes. A player that cannot be
//! fetched is never an error here: failure is data, carried in the returned
//! pending set for the caller to persist and retry in a later run.

use crate::api::{FetchOutcome, PlayerId};
use crate::fetch::progress::ProgressObserver;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

/// Retry pacing for one engine invocation
///
/// Always passed in explicitly; the engine has no built-in defaults, which
/// keeps tests deterministic with a zero delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of rounds over the pending set (>= 1)
    pub max_attempts: u32,

    /// Courtesy delay after every attempted player, success or failure
    pub delay: Duration,
}

/// Everything one engine invocation produced
///
/// Every input id lands in exactly one of `results` or `pending`.
#[derive(Debug, Default)]
pub struct FetchBatch {
    /// Successfully fetched payloads, keyed by player id
    pub results: BTreeMap<PlayerId, Vec<String>>,

    /// Ids still unresolved after the final attempt
    pub pending: Vec<PlayerId>,

    /// Column names from the first successful fetch, if any succeeded
    pub schema: Option<Vec<String>>,
}

/// Fetches a set of players with bounded retries
///
/// Runs up to `policy.max_attempts` rounds. Each round attempts every
/// still-pending id in order; successes move into the result map (capturing
/// the schema from the first one), failures of either flavor stay pending
/// for the next round. Terminates early once nothing is pending. Sleeps
/// `policy.delay` after every attempted id to respect the upstream rate
/// limit, and notifies `progress` as the round advances.
///
/// Duplicate input ids are not deduplicated; each occurrence is attempted
/// independently and the last successful payload wins in the key-unique
/// result map.
///
/// # Arguments
///
/// * `ids` - Players to fetch; may be empty (returns immediately)
/// * `fetch_one` - Per-player fetch; failures are values, never errors
/// * `policy` - Attempt bound and courtesy delay
/// * `progress` - Side-channel observer for the live counter
pub async fn fetch_with_retry<F, Fut>(
    ids: &[PlayerId],
    mut fetch_one: F,
    policy: &RetryPolicy,
    progress: &mut dyn ProgressObserver,
) -> FetchBatch
where
    F: FnMut(PlayerId) -> Fut,
    Fut: Future<Output = FetchOutcome>,
{
    let total = ids.len();
    let mut results: BTreeMap<PlayerId, Vec<String>> = BTreeMap::new();
    let mut schema: Option<Vec<String>> = None;
    let mut pending: Vec<PlayerId> = ids.to_vec();

    for attempt in 1..=policy.max_attempts {
        if pending.is_empty() {
            break;
        }

        tracing::info!(
            "Attempt {}/{}, {} players left",
            attempt,
            policy.max_attempts,
            pending.len()
        );
        progress.attempt_started(attempt, policy.max_attempts, pending.len());

        let mut newly_pending = Vec::new();
        for &player_id in &pending {
            match fetch_one(player_id).await {
                FetchOutcome::Success { values, columns } => {
                    results.insert(player_id, values);
                    if schema.is_none() && !columns.is_empty() {
                        schema = Some(columns);
                    }
                }
                FetchOutcome::Absent => {
                    newly_pending.push(player_id);
                }
                FetchOutcome::Transient { reason } => {
                    tracing::warn!("Error fetching player {}: {}", player_id, reason);
                    newly_pending.push(player_id);
                }
            }

            if !policy.delay.is_zero() {
                tokio::time::sleep(policy.delay).await;
            }

            progress.player_done(results.len(), total, newly_pending.len());
        }

        progress.attempt_finished();
        pending = newly_pending;
    }

    if !pending.is_empty() {
        tracing::warn!(
            "Still skipped {} players after {} attempts",
            pending.len(),
            policy.max_attempts
        );
    }

    FetchBatch {
        results,
        pending,
        schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::progress::NullProgress;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    fn success(values: &[&str], columns: &[&str]) -> FetchOutcome {
        FetchOutcome::Success {
            values: values.iter().map(|v| v.to_string()).collect(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Fetch function driven by a script: for each id, a list of outcomes
    /// consumed one per attempt. Counts calls per id.
    struct ScriptedFetch {
        script: RefCell<HashMap<PlayerId, Vec<FetchOutcome>>>,
        calls: RefCell<HashMap<PlayerId, u32>>,
    }

    impl ScriptedFetch {
        fn new(script: Vec<(PlayerId, Vec<FetchOutcome>)>) -> Self {
            Self {
                script: RefCell::new(script.into_iter().collect()),
                calls: RefCell::new(HashMap::new()),
            }
        }

        async fn fetch(&self, id: PlayerId) -> FetchOutcome {
            *self.calls.borrow_mut().entry(id).or_insert(0) += 1;
            let mut script = self.script.borrow_mut();
            let outcomes = script.get_mut(&id).expect("unscripted id");
            if outcomes.len() > 1 {
                outcomes.remove(0)
            } else {
                outcomes[0].clone()
            }
        }

        fn calls_for(&self, id: PlayerId) -> u32 {
            self.calls.borrow().get(&id).copied().unwrap_or(0)
        }
    }

    #[tokio::test]
    async fn test_empty_input_returns_immediately() {
        let mut called = false;
        let batch = fetch_with_retry(
            &[],
            |_| {
                called = true;
                async { FetchOutcome::Absent }
            },
            &policy(3),
            &mut NullProgress,
        )
        .await;

        assert!(batch.results.is_empty());
        assert!(batch.pending.is_empty());
        assert!(batch.schema.is_none());
        assert!(!called);
    }

    #[tokio::test]
    async fn test_all_succeed_first_attempt() {
        let fetcher = ScriptedFetch::new(vec![
            (1, vec![success(&["1", "10"], &["ID", "PTS"])]),
            (2, vec![success(&["2", "20"], &["ID", "PTS"])]),
        ]);

        let batch = fetch_with_retry(
            &[1, 2],
            |id| fetcher.fetch(id),
            &policy(3),
            &mut NullProgress,
        )
        .await;

        assert_eq!(batch.results.len(), 2);
        assert!(batch.pending.is_empty());
        assert_eq!(batch.schema.as_deref(), Some(&["ID".to_string(), "PTS".to_string()][..]));
        // Early termination: one call each, no further rounds
        assert_eq!(fetcher.calls_for(1), 1);
        assert_eq!(fetcher.calls_for(2), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_scenario() {
        // 1 and 3 succeed on attempt 1; 2 fails on all three attempts.
        let fetcher = ScriptedFetch::new(vec![
            (1, vec![success(&["1"], &["ID"])]),
            (2, vec![FetchOutcome::Absent]),
            (3, vec![success(&["3"], &["ID"])]),
        ]);

        let batch = fetch_with_retry(
            &[1, 2, 3],
            |id| fetcher.fetch(id),
            &policy(3),
            &mut NullProgress,
        )
        .await;

        assert_eq!(batch.results.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(batch.pending, vec![2]);
        assert_eq!(fetcher.calls_for(1), 1);
        assert_eq!(fetcher.calls_for(2), 3);
        assert_eq!(fetcher.calls_for(3), 1);
    }

    #[tokio::test]
    async fn test_fail_soft_always_absent() {
        let fetcher = ScriptedFetch::new(vec![(99, vec![FetchOutcome::Absent])]);

        let batch = fetch_with_retry(
            &[99],
            |id| fetcher.fetch(id),
            &policy(4),
            &mut NullProgress,
        )
        .await;

        assert!(batch.results.is_empty());
        assert_eq!(batch.pending, vec![99]);
        assert!(batch.schema.is_none());
        assert_eq!(fetcher.calls_for(99), 4);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let fetcher = ScriptedFetch::new(vec![(
            5,
            vec![
                FetchOutcome::Transient {
                    reason: "timeout".to_string(),
                },
                success(&["5", "12"], &["ID", "PTS"]),
            ],
        )]);

        let batch = fetch_with_retry(
            &[5],
            |id| fetcher.fetch(id),
            &policy(3),
            &mut NullProgress,
        )
        .await;

        assert_eq!(batch.results.get(&5), Some(&vec!["5".to_string(), "12".to_string()]));
        assert!(batch.pending.is_empty());
        assert_eq!(fetcher.calls_for(5), 2);
    }

    #[tokio::test]
    async fn test_conservation_and_disjointness() {
        let ids: Vec<PlayerId> = vec![10, 11, 12, 13, 14];
        let fetcher = ScriptedFetch::new(vec![
            (10, vec![success(&["10"], &["ID"])]),
            (11, vec![FetchOutcome::Absent]),
            (12, vec![FetchOutcome::Absent, success(&["12"], &["ID"])]),
            (13, vec![FetchOutcome::Transient { reason: "503".to_string() }]),
            (14, vec![success(&["14"], &["ID"])]),
        ]);

        let batch = fetch_with_retry(
            &ids,
            |id| fetcher.fetch(id),
            &policy(2),
            &mut NullProgress,
        )
        .await;

        let mut accounted: Vec<PlayerId> = batch.results.keys().copied().collect();
        accounted.extend(&batch.pending);
        accounted.sort_unstable();
        assert_eq!(accounted, ids);

        for id in batch.results.keys() {
            assert!(!batch.pending.contains(id));
        }
    }

    #[tokio::test]
    async fn test_schema_frozen_at_first_success() {
        let fetcher = ScriptedFetch::new(vec![
            (1, vec![success(&["1"], &["FIRST"])]),
            (2, vec![success(&["2"], &["SECOND"])]),
        ]);

        let batch = fetch_with_retry(
            &[1, 2],
            |id| fetcher.fetch(id),
            &policy(1),
            &mut NullProgress,
        )
        .await;

        assert_eq!(batch.schema, Some(vec!["FIRST".to_string()]));
    }

    #[tokio::test]
    async fn test_monotonic_shrink_observed() {
        /// Records the remaining count at the start of every round.
        #[derive(Default)]
        struct RemainingLog(Vec<usize>);

        impl ProgressObserver for RemainingLog {
            fn attempt_started(&mut self, _a: u32, _m: u32, remaining: usize) {
                self.0.push(remaining);
            }
        }

        let fetcher = ScriptedFetch::new(vec![
            (1, vec![success(&["1"], &["ID"])]),
            (2, vec![FetchOutcome::Absent, success(&["2"], &["ID"])]),
            (3, vec![FetchOutcome::Absent]),
        ]);

        let mut log = RemainingLog::default();
        fetch_with_retry(&[1, 2, 3], |id| fetcher.fetch(id), &policy(3), &mut log).await;

        assert_eq!(log.0, vec![3, 2, 1]);
    }
}
