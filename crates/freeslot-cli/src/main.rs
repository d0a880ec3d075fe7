//! `freeslot` CLI — compute travel availability from calendar free/busy JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Compute available day slots from a saved free/busy response
//! freeslot slots -i freebusy.json --time-min 2025-01-01T00:00:00Z --time-max 2025-01-08T00:00:00Z
//!
//! # Same, reading the document from stdin and writing the report to a file
//! cat freebusy.json | freeslot slots --time-min ... --time-max ... -o report.json
//!
//! # Only consider specific calendars, with local day boundaries
//! freeslot slots -i freebusy.json --calendar work --calendar personal \
//!     --timezone Europe/Paris --time-min ... --time-max ...
//!
//! # Human-readable summary
//! freeslot stats -i freebusy.json --time-min ... --time-max ...
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};

use freeslot_core::provider::{into_busy_map, FreeBusyResponse};
use freeslot_core::slots::availability_report_in_tz;
use freeslot_core::types::AvailabilityReport;

#[derive(Parser)]
#[command(
    name = "freeslot",
    version,
    about = "Travel availability from calendar free/busy data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute available day slots and print the report as JSON
    Slots {
        #[command(flatten)]
        query: QueryArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print a human-readable availability summary
    Stats {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Free/busy JSON document (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Window start, RFC3339 (e.g. 2025-01-01T00:00:00Z)
    #[arg(long)]
    time_min: String,
    /// Window end, RFC3339, exclusive
    #[arg(long)]
    time_max: String,
    /// IANA timezone used for day boundaries
    #[arg(long, default_value = "UTC")]
    timezone: String,
    /// Calendar id to consider (repeatable; defaults to every calendar in the document)
    #[arg(long = "calendar")]
    calendars: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Slots { query, output } => {
            let report = run_query(&query)?;
            let pretty = serde_json::to_string_pretty(&report)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Stats { query } => {
            let report = run_query(&query)?;
            let pto_days: u32 = report
                .available_slots
                .iter()
                .map(|s| s.weekdays_pto_count)
                .sum();
            println!("Days checked:     {}", report.total_days_checked);
            println!("Free slots:       {}", report.free_slots_found);
            println!("Weekday PTO days: {}", pto_days);
        }
    }

    Ok(())
}

/// Parse the free/busy document and compute the availability report.
fn run_query(query: &QueryArgs) -> Result<AvailabilityReport> {
    let raw = read_input(query.input.as_deref())?;
    let response =
        FreeBusyResponse::from_json(&raw).context("Failed to parse free/busy document")?;

    let time_min = parse_utc(&query.time_min).context("Failed to parse --time-min")?;
    let time_max = parse_utc(&query.time_max).context("Failed to parse --time-max")?;
    let tz: Tz = query
        .timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", query.timezone))?;

    // Without an explicit --calendar list, every calendar in the document
    // counts; per-calendar provider errors still surface either way.
    let requested: Vec<String> = if query.calendars.is_empty() {
        response.calendars.keys().cloned().collect()
    } else {
        query.calendars.clone()
    };

    let busy = into_busy_map(&response, &requested)
        .context("Free/busy document is unusable for the requested calendars")?;

    let report = availability_report_in_tz(&busy, time_min, time_max, tz)?;
    Ok(report)
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("'{}' is not an RFC3339 timestamp", raw))?;
    Ok(parsed.with_timezone(&Utc))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
