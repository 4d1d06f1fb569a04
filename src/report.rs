use anyhow::Result;
use std::io::Write;

use crate::models::Report;
use crate::utils::format_duration;

/// Output encoding of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => anyhow::bail!("Unsupported report format: {}", s),
        }
    }
}

/// Write `report` in the requested format
pub fn write_report<W: Write>(
    report: &Report,
    format: ReportFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        ReportFormat::Text => render_text(report, writer),
        ReportFormat::Json => render_json(report, writer),
    }
}

/// Write the fixed-format results block
pub fn render_text<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "===== Benchmark Results =====")?;
    writeln!(writer, "Mode: {}", report.mode)?;
    writeln!(writer, "Total: {}", report.total)?;
    writeln!(writer, "Success: {}", report.success)?;
    writeln!(writer, "Errors: {}", report.errors)?;
    writeln!(writer, "Avg: {}", format_duration(report.avg))?;
    writeln!(writer, "P95: {}", format_duration(report.p95))?;
    writeln!(writer, "P99: {}", format_duration(report.p99))?;
    writeln!(writer, "RPS: {:.2}", report.rps)?;
    writeln!(writer, "Time: {}", format_duration(report.elapsed))?;
    writeln!(writer, "=============================")?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write the report as pretty-printed JSON
pub fn render_json<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
