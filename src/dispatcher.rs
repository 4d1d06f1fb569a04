use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::ConfigError;
use crate::models::{Outcome, RunConfig};
use crate::worker;

/// A launched set of workers
pub struct Dispatch {
    /// Monotonic start of the run, taken right before the first worker is spawned
    pub started: Instant,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Receiving end of the result sink, closed once every worker has finished
    pub results: mpsc::Receiver<Outcome>,
    /// Task that waits for all workers and then closes the sink
    pub watcher: JoinHandle<()>,
}

/// Spawn one task per configured worker, staggering their start by the ramp.
///
/// The result sink holds every outcome the run can produce, so workers never
/// wait on a full channel.
pub fn launch(config: &RunConfig, client: Arc<Client>) -> Result<Dispatch, ConfigError> {
    let capacity = config.total_requests()?;
    let (tx, rx) = mpsc::channel::<Outcome>(capacity);

    info!(
        event = "dispatch_started",
        workers = config.workers,
        requests_per_worker = config.requests_per_worker,
        ramp_secs = config.ramp.as_secs(),
        step_ms = config.ramp_step().as_millis() as u64,
        message = "Launching workers"
    );

    let started = Instant::now();
    let started_at = Utc::now();

    let handles: Vec<JoinHandle<()>> = (0..config.workers)
        .map(|id| {
            tokio::spawn(worker::run(
                id,
                client.clone(),
                config.url.clone(),
                config.requests_per_worker,
                config.start_delay(id),
                tx.clone(),
            ))
        })
        .collect();

    let watcher = tokio::spawn(async move {
        for (id, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = joined {
                error!(
                    event = "worker_panicked",
                    worker = id,
                    error = %e,
                    message = "Worker task did not complete"
                );
            }
        }

        // Last sender: dropping it ends the aggregator's drain.
        drop(tx);
        info!(event = "dispatch_finished", message = "All workers finished");
    });

    Ok(Dispatch {
        started,
        started_at,
        results: rx,
        watcher,
    })
}
