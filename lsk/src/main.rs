//! `lsk`: discover a log skeleton from an event log file and print it as JSON
//!
//! ```bash
//! lsk running-example.xes --noise-threshold 0.1 --extended-trace true --pretty
//! ```
//!
//! Supported inputs are `.xes`, `.xes.gz` and `.json` event logs.
//! Log output goes to stderr (configure with `RUST_LOG`), so stdout only contains the model.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log_skeleton::core::event_data::case_centric::constants::{TRACE_END, TRACE_START};
use log_skeleton::{ActivitySet, EventLog, Importable, LogSkeletonDiscovery};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Discover a log skeleton from an event log
#[derive(Parser, Debug)]
#[command(name = "lsk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Event log to discover from (`.xes`, `.xes.gz` or `.json`)
    input: PathBuf,

    /// Fraction of traces allowed to violate a relation (clamped to [0, 1])
    #[arg(long, env = "LSK_NOISE_THRESHOLD", default_value_t = 0.0, allow_negative_numbers = true)]
    noise_threshold: f64,

    /// Add artificial start/end activities to every trace and report pairs involving them
    ///
    /// Accepts `true`/`1` and `false`/`0`; anything else counts as `false`.
    #[arg(
        long,
        env = "LSK_EXTENDED_TRACE",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    extended_trace: bool,

    /// Write the model to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_lenient_bool(value: &str) -> Result<bool, String> {
    Ok(matches!(value.trim().to_lowercase().as_str(), "true" | "1"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Value> {
    let mut log = EventLog::import_from_path(&args.input)
        .with_context(|| format!("Failed to import event log from {:?}", args.input))?;
    if args.extended_trace {
        log.extend_traces();
    }
    let activities = ActivitySet::from_log(&log).context("Failed to collect activities")?;
    tracing::debug!(
        traces = log.traces.len(),
        activities = activities.len(),
        "imported event log"
    );

    let discovery = LogSkeletonDiscovery::builder()
        .log(&log)
        .activities(&activities)
        .noise_threshold(args.noise_threshold)
        .include_extensions(args.extended_trace)
        .build()?;
    let model = discovery.apply().context("Failed to discover log skeleton")?;

    let mut parameters = json!({
        "noise-threshold": discovery.noise_threshold().value(),
        "extended-trace": args.extended_trace,
    });
    if args.extended_trace {
        parameters["trace-start"] = TRACE_START.into();
        parameters["trace-end"] = TRACE_END.into();
    }
    let mut output = serde_json::to_value(&model)?;
    output["parameters"] = parameters;
    Ok(output)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let output = run(&args)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {path:?}"))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &output)?;
    } else {
        serde_json::to_writer(&mut writer, &output)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
