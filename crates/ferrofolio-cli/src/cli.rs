//! CLI argument definitions for ferrofolio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `convert` | Convert a broker export into a portfolio import document |
//! | `detect` | Report which broker format a file uses |
//! | `brokers` | List supported broker formats |
//!
//! # Examples
//!
//! ```bash
//! ferrofolio convert transactions.csv --account-id 7d1c --pretty
//! ferrofolio convert export.csv --broker degiro-v3 --output import.json
//! ferrofolio detect export.csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Broker export to portfolio activity converter.
#[derive(Debug, Parser)]
#[command(name = "ferrofolio", author, version, about)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log debug detail (lookup attempts, cache hits) to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Do not load variables from a `.env` file.
    #[arg(long, global = true, default_value_t = false)]
    pub no_dotenv: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a broker CSV export into the activity import document.
    ///
    /// The broker is detected from the header line unless `--broker` is given.
    /// Settings not passed as flags come from FERROFOLIO_* environment variables.
    Convert(ConvertArgs),

    /// Detect the broker format of a CSV export from its header line.
    Detect(DetectArgs),

    /// List supported broker ids with their delimiter and column count.
    Brokers,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// CSV export to convert.
    pub file: PathBuf,

    /// Broker id; skips header detection.
    #[arg(long)]
    pub broker: Option<String>,

    /// Account every activity is booked on.
    #[arg(long, env = "FERROFOLIO_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Write the document here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tag attached to every activity; repeatable.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Base URL of the symbol-lookup service.
    #[arg(long)]
    pub lookup_url: Option<String>,

    /// Treat legacy DEGIRO exports as the v3 format.
    #[arg(long, default_value_t = false)]
    pub degiro_force_v3: bool,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// CSV export to inspect.
    pub file: PathBuf,
}
