use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::models::{Mode, Outcome, Report};

/// Accumulates outcome records until the run is over
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    errors: usize,
    latencies: Vec<Duration>,
    sum: Duration,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one outcome
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.failed {
            self.errors += 1;
            return;
        }
        self.latencies.push(outcome.latency);
        self.sum += outcome.latency;
    }

    /// Receive outcomes until every sender is gone, ticking `progress` once per record
    pub async fn drain(
        mut self,
        results: &mut mpsc::Receiver<Outcome>,
        progress: &ProgressBar,
    ) -> Self {
        while let Some(outcome) = results.recv().await {
            self.record(outcome);
            progress.inc(1);
        }
        self
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn successes(&self) -> usize {
        self.latencies.len()
    }

    /// Sort the collected latencies and compute the report.
    ///
    /// `started` is the dispatch start; the elapsed time ends now.
    pub fn finish(mut self, mode: Mode, started: Instant, started_at: DateTime<Utc>) -> Report {
        self.latencies.sort_unstable();

        let elapsed = started.elapsed();
        let success = self.latencies.len();
        let total = success + self.errors;

        Report {
            mode,
            started_at,
            total,
            success,
            errors: self.errors,
            avg: mean(self.sum, success),
            p95: percentile(&self.latencies, 0.95),
            p99: percentile(&self.latencies, 0.99),
            rps: total as f64 / elapsed.as_secs_f64(),
            elapsed,
        }
    }
}

/// Mean of `count` latencies summing to `sum`, zero when there are none
pub fn mean(sum: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((sum.as_nanos() / count as u128) as u64)
}

/// Index of the `p` percentile in a sorted sequence of length `len`.
///
/// Rounds half up and clamps to the last element. An empty sequence yields 0.
pub fn percentile_index(len: usize, p: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let index = (len as f64 * p + 0.5) as usize;
    index.min(len - 1)
}

/// Calculate a percentile from a sorted list of durations
pub fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    sorted[percentile_index(sorted.len(), p)]
}
