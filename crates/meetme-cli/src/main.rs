//! `meetme` CLI: list calendars and compute free time from a calendar export.
//!
//! ## Usage
//!
//! ```sh
//! # Calendars in the export, primary first
//! meetme calendars -i export.json
//!
//! # Free time for the default calendars, tomorrow through a week from today, 9am-5pm UTC
//! meetme free -i export.json
//!
//! # Explicit dates, window, zone and calendars, as a message to paste into an email
//! meetme free -i export.json --dates "03/16/2026 - 03/20/2026" \
//!     --start 10am --end 4:30pm --timezone America/Los_Angeles \
//!     -c me@example.com -c team@example.com --format message
//!
//! # Request settings from a file; flags still win
//! meetme free -i export.json --request request.json --format json -o free.json
//! ```

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use meetme_engine::gateway::sort_calendars;
use meetme_engine::report::{render_calendar_list, render_json, render_message, render_table};
use meetme_engine::{
    compute_availability, CalendarGateway, ExportGateway, MalformedPolicy, RequestConfig,
};

#[derive(Parser)]
#[command(
    name = "meetme",
    version,
    about = "Find free time across your calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the calendars in an export
    Calendars {
        /// Calendar export file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute free intervals
    Free {
        /// Calendar export file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// JSON request file; flags below override its fields
        #[arg(long)]
        request: Option<String>,
        /// Calendar id to include (repeatable; defaults to the selected calendars)
        #[arg(short, long = "calendar")]
        calendars: Vec<String>,
        /// Dates as "MM/DD/YYYY - MM/DD/YYYY" or a single MM/DD/YYYY
        #[arg(long)]
        dates: Option<String>,
        /// Start of the daily window, e.g. 9am or 09:00
        #[arg(long)]
        start: Option<String>,
        /// End of the daily window, e.g. 5pm or 17:00
        #[arg(long)]
        end: Option<String>,
        /// IANA time zone every event is converted into
        #[arg(long)]
        timezone: Option<String>,
        /// Only report free intervals at least this many minutes long
        #[arg(long)]
        min_minutes: Option<i64>,
        /// Fail on the first malformed event instead of skipping it
        #[arg(long)]
        strict: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Message,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Calendars { input, output } => {
            let gateway = load_export(input.as_deref())?;
            let mut calendars = gateway
                .list_calendars()
                .context("Failed to list calendars")?;
            sort_calendars(&mut calendars);
            write_output(output.as_deref(), &render_calendar_list(&calendars))?;
        }
        Commands::Free {
            input,
            request,
            calendars,
            dates,
            start,
            end,
            timezone,
            min_minutes,
            strict,
            format,
            output,
        } => {
            let file_config = match request.as_deref() {
                Some(path) => RequestConfig::from_path(Path::new(path))
                    .with_context(|| format!("Failed to load request file: {}", path))?,
                None => RequestConfig::default(),
            };
            let flags = RequestConfig {
                calendars,
                daterange: dates,
                start_time: start,
                end_time: end,
                timezone,
                on_malformed: strict.then_some(MalformedPolicy::Abort),
            };
            let request = file_config
                .merged_with(flags)
                .resolve(Utc::now())
                .context("Invalid request")?;
            info!(
                "Free time {} to {}, {} to {} in {}",
                request.dates.first(),
                request.dates.last(),
                request.window.start().format("%H:%M"),
                request.window.end().format("%H:%M"),
                request.zone
            );

            let gateway = load_export(input.as_deref())?;
            let mut availability =
                compute_availability(&gateway, &request).context("Failed to compute free time")?;
            if let Some(min) = min_minutes {
                availability.free.retain(|slot| slot.duration_minutes() >= min);
            }
            debug!(
                "{} free intervals from {} busy events",
                availability.free.len(),
                availability.busy.len()
            );

            let rendered = match format {
                Format::Table => render_table(&availability.free),
                Format::Message => render_message(&availability.free),
                Format::Json => {
                    let mut json = render_json(&availability.free)
                        .context("Failed to serialize free intervals")?;
                    json.push('\n');
                    json
                }
            };
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

/// Default filter `warn`, raised by each `-v`; `RUST_LOG` overrides both.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_export(path: Option<&str>) -> Result<ExportGateway> {
    let text = read_input(path)?;
    ExportGateway::from_json(&text).context("Failed to load calendar export")
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
            print!("{}", content);
        }
    }
    Ok(())
}
