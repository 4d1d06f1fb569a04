use std::path::PathBuf;
use thiserror::Error;

/// Invalid command line or builder input, detected before any work starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mode must be pg or my (got {0:?})")]
    InvalidMode(String),

    #[error("uri is required")]
    MissingUrl,

    #[error("invalid uri {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("workers and reqs must be >0")]
    NonPositiveCounts,

    #[error("ramp must be >=0")]
    NegativeRamp,

    #[error("total request count is too large")]
    TooManyRequests,

    #[error("dsn required")]
    MissingDsn,

    #[error("sql file required")]
    MissingScript,
}

/// Failure of the schema initialisation action
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to read sql file: {}: {source}", path.display())]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("db open error: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("sql exec error: {0}")]
    Execute(#[source] sqlx::Error),
}
