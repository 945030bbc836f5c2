//! `planner-layout` CLI — lay out calendar events from the command line.
//!
//! Used by document-generation pipelines that prefer a subprocess over linking
//! the library, and for inspecting layouts while debugging a renderer.
//!
//! ## Usage
//!
//! ```sh
//! # Print the slots of a window
//! planner-layout slots --start 08:00 --end 17:30 --granularity 30
//!
//! # Lay out events (stdin → stdout) with the default config
//! cat week.json | planner-layout layout
//!
//! # Lay out with a config file and a 5.5pt average glyph width
//! planner-layout layout -i week.json -c letter.json --char-width 5.5 -o boxes.json
//!
//! # Split multi-day events into per-day records for a week
//! planner-layout split -i raw.json --first-day 2026-03-02 --days 7 --timezone America/New_York
//!
//! # Show the style category of each event
//! planner-layout classify -i week.json
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planner_layout::{build_slots, layout, monospace, split_by_day, EventRecord, LayoutConfig};
use serde::Serialize;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "planner-layout",
    version,
    about = "Lay out calendar events on a day/week grid"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the time slots of a window
    Slots {
        /// First visible time (HH:MM)
        #[arg(long, default_value = "06:00")]
        start: String,
        /// Last time at which a slot may start (HH:MM)
        #[arg(long, default_value = "23:30")]
        end: String,
        /// Slot size in minutes
        #[arg(short, long, default_value_t = 30)]
        granularity: u32,
    },
    /// Lay out a JSON array of events
    Layout {
        /// Input events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Layout config JSON file (defaults apply to omitted fields)
        #[arg(short, long)]
        config: Option<String>,
        /// Average glyph width used to measure titles
        #[arg(long, default_value_t = 6.0)]
        char_width: f64,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Split multi-day events into one record per visible day
    Split {
        /// Input events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First visible day (YYYY-MM-DD)
        #[arg(long)]
        first_day: String,
        /// Number of visible days
        #[arg(long, default_value_t = 7)]
        days: usize,
        /// IANA timezone whose midnights cut the events
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Print the style category of each event
    Classify {
        /// Input events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Layout config JSON file providing classifier rules
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[derive(Serialize)]
struct Classified<'a> {
    id: &'a str,
    category: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Slots {
            start,
            end,
            granularity,
        } => {
            let start = parse_hhmm(&start)?;
            let end = parse_hhmm(&end)?;
            let slots = build_slots(start, end, granularity).context("Failed to build slots")?;
            for slot in slots {
                println!("{}\t{}", slot.index, format_hhmm(slot.start_minute));
            }
        }
        Commands::Layout {
            input,
            output,
            config,
            char_width,
            pretty,
        } => {
            let events = read_events(input.as_deref())?;
            let config = load_config(config.as_deref())?;
            anyhow::ensure!(
                char_width.is_finite() && char_width > 0.0,
                "--char-width must be positive, got {}",
                char_width
            );

            let laid_out =
                layout(&events, &config, monospace(char_width)).context("Layout failed")?;
            log::info!("laid out {} of {} events", laid_out.len(), events.len());

            let json = if pretty {
                serde_json::to_string_pretty(&laid_out)?
            } else {
                serde_json::to_string(&laid_out)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Split {
            input,
            output,
            first_day,
            days,
            timezone,
        } => {
            let events = read_events(input.as_deref())?;
            let first_day = NaiveDate::parse_from_str(&first_day, "%Y-%m-%d")
                .with_context(|| format!("Invalid --first-day: {}", first_day))?;
            let tz: chrono_tz::Tz = timezone
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", timezone))?;

            let pieces: Vec<EventRecord> = events
                .iter()
                .flat_map(|e| split_by_day(e, first_day, days, tz))
                .collect();
            write_output(output.as_deref(), &serde_json::to_string_pretty(&pieces)?)?;
        }
        Commands::Classify { input, config } => {
            let events = read_events(input.as_deref())?;
            let config = load_config(config.as_deref())?;

            let classified: Vec<Classified> = events
                .iter()
                .map(|e| Classified {
                    id: &e.id,
                    category: config.classifier.classify(e).as_str(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&classified)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Parse "HH:MM" into minutes since midnight. "24:00" is accepted.
fn parse_hhmm(s: &str) -> Result<u32> {
    let (h, m) = s
        .split_once(':')
        .with_context(|| format!("Expected HH:MM, got '{}'", s))?;
    let hours: u32 = h
        .trim()
        .parse()
        .with_context(|| format!("Invalid hour in '{}'", s))?;
    let minutes: u32 = m
        .trim()
        .parse()
        .with_context(|| format!("Invalid minute in '{}'", s))?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        anyhow::bail!("Time out of range: '{}'", s);
    }
    Ok(hours * 60 + minutes)
}

fn format_hhmm(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn load_config(path: Option<&str>) -> Result<LayoutConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            LayoutConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config: {}", path))?
        }
        None => LayoutConfig::default(),
    };
    config.validate().context("Invalid layout config")?;
    Ok(config)
}

fn read_events(path: Option<&str>) -> Result<Vec<EventRecord>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse events JSON")
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
