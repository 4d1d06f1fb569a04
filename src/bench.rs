use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use crate::aggregate::Aggregator;
use crate::dispatcher;
use crate::models::{Report, RunConfig};

/// Build the HTTP client shared by every worker
pub fn build_client(config: &RunConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .pool_max_idle_per_host(config.workers as usize)
        .build()
        .context("Failed to build HTTP client")
}

/// Run the benchmark described by `config` and return its report.
///
/// With `show_progress` a bar counting completed requests is drawn on stderr.
pub async fn run(config: &RunConfig, show_progress: bool) -> Result<Report> {
    let client = Arc::new(build_client(config)?);
    let total = config.total_requests()?;

    let progress = if show_progress {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("##-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    info!(
        event = "run_started",
        mode = %config.mode,
        url = config.url.as_str(),
        total_requests = total,
        message = "Starting benchmark"
    );

    let mut dispatch = dispatcher::launch(config, client)?;

    let aggregator = Aggregator::new()
        .drain(&mut dispatch.results, &progress)
        .await;
    dispatch.watcher.await.context("Dispatcher watcher failed")?;

    let report = aggregator.finish(config.mode, dispatch.started, dispatch.started_at);
    progress.finish_and_clear();

    info!(
        event = "run_completed",
        total = report.total,
        success = report.success,
        errors = report.errors,
        elapsed_ms = report.elapsed.as_millis() as u64,
        message = "Benchmark completed"
    );

    Ok(report)
}
