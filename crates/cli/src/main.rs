// fieldplan CLI - headless prospect planning
// Reads the three spreadsheet exports, runs the engine, prints or writes the result.

mod config;
mod exit_codes;
mod export;
mod inputs;
mod plan;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{engine_exit_code, io_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use inputs::InputArgs;

#[derive(Parser)]
#[command(name = "fplan")]
#[command(about = "Reconcile prospects against accounts and outreach, then plan the next visits")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the next visit plan
    #[command(after_help = "\
Examples:
  fplan plan --accounts accounts.csv --prospects prospects.csv --outreach outreach.csv
  fplan plan --prospects prospects.csv --today 2026-06-15 --max-stops 8
  fplan plan --prospects prospects.csv --json | jq '.stops[].companyName'
  fplan plan --prospects prospects.csv --fail-on-empty")]
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        /// Override [planner] max_stops from the config
        #[arg(long)]
        max_stops: Option<usize>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Exit 5 when no prospect is eligible
        #[arg(long)]
        fail_on_empty: bool,
    },

    /// Dashboard counts: customers, high-priority leads, follow-ups, revenue
    #[command(after_help = "\
Examples:
  fplan stats --accounts accounts.csv --prospects prospects.csv --outreach outreach.csv
  fplan stats --prospects prospects.csv --json")]
    Stats {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Show prospects after account and outreach linkage
    #[command(after_help = "\
Examples:
  fplan reconcile --accounts accounts.csv --prospects prospects.csv --outreach outreach.csv
  fplan reconcile --prospects prospects.csv --outreach outreach.csv --json
  fplan reconcile --accounts a.csv --prospects p.csv --output reconciled.json
  fplan reconcile --prospects p.csv --outreach o.csv --filter stale")]
    Reconcile {
        #[command(flatten)]
        inputs: InputArgs,

        /// Only list prospects matching this filter
        #[arg(long, value_enum, default_value_t = report::Filter::All)]
        filter: report::Filter,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Normalize an outreach log and export it as quoted CSV
    #[command(after_help = "\
Examples:
  fplan export --outreach outreach.csv
  fplan export --outreach outreach.csv --output logs.csv
  fplan export --outreach outreach.csv --output -")]
    Export {
        /// Outreach log CSV/TSV
        #[arg(long)]
        outreach: PathBuf,

        /// Output file, `-` for stdout (default: outreach_export_<today>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Date used for missing visit dates and the default file name (YYYY-MM-DD)
        #[arg(long, value_parser = inputs::parse_today)]
        today: Option<chrono::NaiveDate>,

        /// Seed for generated log ids
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Engine config file tools
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Plan {
            inputs,
            max_stops,
            json,
            fail_on_empty,
        } => plan::cmd_plan(inputs, max_stops, json, fail_on_empty),
        Commands::Stats { inputs, json } => report::cmd_stats(inputs, json),
        Commands::Reconcile {
            inputs,
            filter,
            json,
            output,
        } => report::cmd_reconcile(inputs, filter, json, output),
        Commands::Export {
            outreach,
            output,
            today,
            seed,
        } => export::cmd_export(outreach, output, today, seed),
        Commands::Config { command } => config::cmd_config(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Install the stderr logger. Default level is `warn`.
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

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<fieldplan_io::IoError> for CliError {
    fn from(err: fieldplan_io::IoError) -> Self {
        Self::new(io_exit_code(&err), err.to_string())
    }
}

impl From<fieldplan_engine::EngineError> for CliError {
    fn from(err: fieldplan_engine::EngineError) -> Self {
        Self::new(engine_exit_code(&err), err.to_string())
    }
}
