use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest capacity a bounded tokio channel accepts
const MAX_OUTCOMES: usize = usize::MAX >> 3;

/// Database flavour under test
///
/// On `run` this is only a label in the report. On `init` it selects the
/// database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// PostgreSQL
    Pg,
    /// MySQL
    My,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pg => f.write_str("pg"),
            Mode::My => f.write_str("my"),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pg" => Ok(Mode::Pg),
            "my" => Ok(Mode::My),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Result of a single request attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// How long the request took, zero when it failed
    pub latency: Duration,
    /// Whether the request failed at the transport level
    pub failed: bool,
}

impl Outcome {
    pub fn success(latency: Duration) -> Self {
        Self { latency, failed: false }
    }

    pub fn failure() -> Self {
        Self {
            latency: Duration::ZERO,
            failed: true,
        }
    }
}

/// Validated parameters of a benchmark run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Report label
    pub mode: Mode,
    /// Target of every GET request
    pub url: Url,
    /// Number of concurrent workers
    pub workers: u32,
    /// Sequential requests issued by each worker
    pub requests_per_worker: u32,
    /// Window over which worker start times are spread
    pub ramp: Duration,
    /// Timeout for each request
    pub timeout: Duration,
}

impl RunConfig {
    /// Validate raw values as they arrive from the command line.
    ///
    /// Counts are taken as signed integers so that zero and negative inputs
    /// are reported here rather than by the argument parser.
    pub fn new(
        mode: &str,
        url: &str,
        workers: i64,
        requests_per_worker: i64,
        ramp_secs: i64,
    ) -> Result<Self, ConfigError> {
        let mode = mode.parse::<Mode>()?;

        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let url = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        if workers <= 0 || requests_per_worker <= 0 {
            return Err(ConfigError::NonPositiveCounts);
        }
        let workers = u32::try_from(workers).map_err(|_| ConfigError::TooManyRequests)?;
        let requests_per_worker =
            u32::try_from(requests_per_worker).map_err(|_| ConfigError::TooManyRequests)?;

        if ramp_secs < 0 {
            return Err(ConfigError::NegativeRamp);
        }

        let config = Self {
            mode,
            url,
            workers,
            requests_per_worker,
            ramp: Duration::from_secs(ramp_secs as u64),
            timeout: DEFAULT_TIMEOUT,
        };
        config.total_requests()?;
        Ok(config)
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of outcome records a complete run produces
    pub fn total_requests(&self) -> Result<usize, ConfigError> {
        (self.workers as usize)
            .checked_mul(self.requests_per_worker as usize)
            .filter(|total| *total <= MAX_OUTCOMES)
            .ok_or(ConfigError::TooManyRequests)
    }

    /// Start offset between two consecutive workers
    pub fn ramp_step(&self) -> Duration {
        self.ramp / self.workers
    }

    /// Start delay of the worker at `index` (0-based)
    pub fn start_delay(&self, index: u32) -> Duration {
        self.ramp_step() * index
    }
}

/// Validated parameters of the schema initialisation action
#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Selects the database driver
    pub mode: Mode,
    /// Database connection string
    pub dsn: String,
    /// SQL script executed as one batch
    pub script: PathBuf,
}

impl InitConfig {
    pub fn new(mode: &str, dsn: &str, script: &str) -> Result<Self, ConfigError> {
        let mode = mode.parse::<Mode>()?;
        if dsn.is_empty() {
            return Err(ConfigError::MissingDsn);
        }
        if script.is_empty() {
            return Err(ConfigError::MissingScript);
        }
        Ok(Self {
            mode,
            dsn: dsn.to_string(),
            script: PathBuf::from(script),
        })
    }
}

/// Aggregate statistics of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Mode label of the run
    pub mode: Mode,
    /// When dispatch started
    pub started_at: DateTime<Utc>,
    /// Number of attempts, `success + errors`
    pub total: usize,
    /// Number of requests that completed
    pub success: usize,
    /// Number of transport failures
    pub errors: usize,
    /// Mean latency of successful requests
    pub avg: Duration,
    /// 95th percentile latency
    pub p95: Duration,
    /// 99th percentile latency
    pub p99: Duration,
    /// Attempts per second of wall-clock time
    pub rps: f64,
    /// Wall-clock time from dispatch to the end of the drain
    pub elapsed: Duration,
}
