//! Rampbench - a ramped HTTP GET benchmarker
//!
//! Rampbench starts a fixed number of workers, staggers their start over a
//! ramp window, lets each one issue a fixed number of sequential GET
//! requests, and reports throughput and latency percentiles. It can be used
//! as a command-line tool or as a library.
//!
//! # Example
//!
//! ```rust,no_run
//! use rampbench::{BenchmarkBuilder, Mode};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let report = BenchmarkBuilder::new()
//!         .mode(Mode::Pg)
//!         .url("http://localhost:8080/items")
//!         .workers(20)             // 20 concurrent workers
//!         .requests_per_worker(50) // 50 requests each
//!         .ramp(10)                // all workers running after 10 seconds
//!         .timeout(Duration::from_secs(5))
//!         .run()
//!         .await?;
//!
//!     println!("p99: {:?}, {:.2} req/s", report.p99, report.rps);
//!     Ok(())
//! }
//! ```

mod aggregate;
mod bench;
mod dispatcher;
mod error;
mod init;
mod models;
mod report;
mod utils;
mod worker;

pub use aggregate::{mean, percentile, percentile_index, Aggregator};
pub use bench::{build_client, run};
pub use dispatcher::{launch, Dispatch};
pub use error::{ConfigError, InitError};
pub use init::run as init_schema;
pub use models::{InitConfig, Mode, Outcome, Report, RunConfig, DEFAULT_TIMEOUT};
pub use report::{render_json, render_text, write_report, ReportFormat};
pub use utils::{format_duration, get_writer};
pub use worker::{make_request, run as run_worker};

use anyhow::Result;
use std::time::Duration;

/// Builder for configuring and running a benchmark
pub struct BenchmarkBuilder {
    mode: Mode,
    url: String,
    workers: i64,
    requests_per_worker: i64,
    ramp: i64,
    timeout: Duration,
    progress: bool,
}

impl Default for BenchmarkBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Pg,
            url: String::new(),
            workers: 10,
            requests_per_worker: 100,
            ramp: 0,
            timeout: DEFAULT_TIMEOUT,
            progress: false,
        }
    }
}

impl BenchmarkBuilder {
    /// Create a new BenchmarkBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode label shown in the report
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the target URL
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Set the number of concurrent workers
    pub fn workers(mut self, workers: i64) -> Self {
        self.workers = workers;
        self
    }

    /// Set the number of sequential requests each worker issues
    pub fn requests_per_worker(mut self, requests: i64) -> Self {
        self.requests_per_worker = requests;
        self
    }

    /// Set the ramp window in seconds
    pub fn ramp(mut self, secs: i64) -> Self {
        self.ramp = secs;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Draw a progress bar on stderr while running
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Validate the settings into a [`RunConfig`]
    pub fn config(&self) -> Result<RunConfig, ConfigError> {
        Ok(RunConfig::new(
            &self.mode.to_string(),
            &self.url,
            self.workers,
            self.requests_per_worker,
            self.ramp,
        )?
        .with_timeout(self.timeout))
    }

    /// Run the benchmark and return its report.
    ///
    /// Invalid settings are rejected before any request is made.
    pub async fn run(self) -> Result<Report> {
        let config = self.config()?;
        bench::run(&config, self.progress).await
    }
}
