//! Command-line interface for claude-pulse.
//!
//! Two commands share one pipeline:
//! - `report`: full scan, write the dashboard artifact JSON once, exit
//! - `serve`: serve the read-only HTTP API and the embedded frontend

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::analytics::Aggregator;
use crate::discovery::DataDirectory;
use crate::error::Result;
use crate::report::{build_report, write_report};
use crate::server;

/// Personal dashboard for Claude Code session logs.
#[derive(Debug, Parser)]
#[command(name = "pulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the Claude data directory (default: ~/.claude).
    #[arg(short = 'd', long, global = true, env = "CLAUDE_PULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "PULSE_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact).
    #[arg(long, global = true, default_value = "text", env = "PULSE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the logs and write the dashboard artifact JSON.
    #[command(alias = "r")]
    Report(ReportArgs),

    /// Serve the dashboard API and frontend over HTTP.
    #[command(alias = "s")]
    Serve(ServeArgs),
}

/// Arguments for the report command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Output path for the artifact.
    #[arg(short = 'o', long, default_value = "dashboard-stats.json")]
    pub out: PathBuf,
}

/// Arguments for the serve command.
#[derive(Debug, Clone, clap::Args)]
pub struct ServeArgs {
    /// Port to listen on (localhost only).
    #[arg(short = 'p', long, default_value_t = server::DEFAULT_PORT, env = "CLAUDE_PULSE_PORT")]
    pub port: u16,
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Resolve the data directory from CLI options or discovery.
fn data_directory(cli: &Cli) -> Result<DataDirectory> {
    match &cli.data_dir {
        Some(path) => DataDirectory::from_path(path),
        None => DataDirectory::discover(),
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Commands::Report(args) => run_report(&cli, args),
        Commands::Serve(args) => run_serve(&cli, args),
    }
}

/// Batch mode: one full scan, one artifact, exit.
fn run_report(cli: &Cli, args: &ReportArgs) -> Result<()> {
    let data = data_directory(cli)?;
    let aggregator = Aggregator::new();
    let scan = aggregator.scan(&data)?;

    // A malformed cache aborts only the cache-derived portion
    let cache = match data.load_usage_cache() {
        Ok(cache) => cache,
        Err(e) => {
            warn!(error = %e, "Usage cache unusable, continuing with scan data only");
            None
        }
    };

    let report = build_report(&scan, cache.as_ref(), aggregator.now());
    write_report(&args.out, &report)?;

    println!(
        "Wrote {} ({} sessions, {} messages, {} projects)",
        args.out.display(),
        report.summary.total_sessions,
        report.summary.total_messages,
        report.projects.len()
    );
    Ok(())
}

/// Server mode: blocking scans per request on a tokio runtime.
fn run_serve(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let data = data_directory(cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| crate::error::PulseError::server(format!("Failed to start runtime: {e}")))?;

    println!("Dashboard on http://127.0.0.1:{}", args.port);
    runtime.block_on(server::serve(data, args.port))
}
