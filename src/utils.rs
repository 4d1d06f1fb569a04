use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

/// Get a writer for a file or stdout
pub fn get_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "stdout" {
        Ok(Box::new(io::stdout()))
    } else {
        let file = File::create(path).context(format!("Failed to create file: {}", path))?;
        Ok(Box::new(file))
    }
}

/// Format a duration in a human-readable format
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let total_nanos = duration.as_nanos();
    if total_nanos < 1_000 {
        return format!("{}ns", total_nanos);
    }

    if duration.as_micros() < 1_000 {
        return format!("{:.2}µs", duration.as_secs_f64() * 1_000_000.0);
    }

    if duration.as_millis() < 1_000 {
        return format!("{:.2}ms", duration.as_secs_f64() * 1000.0);
    }

    let total_secs = duration.as_secs_f64();
    if total_secs < 60.0 {
        return format!("{:.2}s", total_secs);
    }

    let minutes = (total_secs / 60.0).floor();
    let seconds = total_secs - (minutes * 60.0);
    format!("{}m{:.2}s", minutes as u64, seconds)
}
