use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use rampbench::{get_writer, init_schema, write_report, InitConfig, ReportFormat, RunConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark an HTTP endpoint
    Run {
        /// Mode label for the report [pg, my]
        #[arg(long, default_value = "")]
        mode: String,

        /// Benchmark URL
        #[arg(long, default_value = "")]
        uri: String,

        /// Number of workers
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        workers: i64,

        /// Requests per worker
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        reqs: i64,

        /// Ramp seconds over which worker starts are spread
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        ramp: i64,

        /// Per-request timeout
        #[arg(long, default_value = "5s")]
        timeout: humantime::Duration,

        /// Report format [text, json]
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file
        #[arg(long, default_value = "stdout")]
        output: String,

        /// Show a progress bar on stderr
        #[arg(long)]
        progress: bool,
    },

    /// Apply a SQL script to a database
    Init {
        /// Database driver [pg, my]
        #[arg(long, default_value = "")]
        mode: String,

        /// Database connection string
        #[arg(long, default_value = "")]
        dsn: String,

        /// Path to sql file
        #[arg(long, default_value = "")]
        sql: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rampbench=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error the way the tool reports all failures and exit non-zero
fn fail(message: impl std::fmt::Display) -> ! {
    println!("Error: {}", message);
    process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Run {
            mode,
            uri,
            workers,
            reqs,
            ramp,
            timeout,
            format,
            output,
            progress,
        }) => {
            let config = match RunConfig::new(&mode, &uri, workers, reqs, ramp) {
                Ok(config) => config.with_timeout(timeout.into()),
                Err(e) => fail(e),
            };
            let format: ReportFormat = match format.parse() {
                Ok(format) => format,
                Err(e) => fail(e),
            };

            let report = match rampbench::run(&config, progress).await {
                Ok(report) => report,
                Err(e) => fail(format!("{:#}", e)),
            };

            let mut writer = get_writer(&output)?;
            write_report(&report, format, &mut writer).context("Failed to write report")?;
        }
        Some(Commands::Init { mode, dsn, sql }) => {
            let config = match InitConfig::new(&mode, &dsn, &sql) {
                Ok(config) => config,
                Err(e) => fail(e),
            };
            if let Err(e) = init_schema(&config).await {
                println!("{}", e);
                process::exit(1);
            }
            println!("init done");
        }
        None => {
            println!("Usage: rampbench <run|init> [flags...]");
            process::exit(1);
        }
    }

    Ok(())
}
