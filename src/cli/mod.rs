//! Command-line interface for `issuelens`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use issuelens_lib::{Dimension, SortKey};

use crate::config::Config;
use crate::logging;

/// `issuelens` (ilens) - Issue analytics for Jira-style exports.
#[derive(Parser, Debug)]
#[command(name = "ilens")]
#[command(
    author,
    version,
    about = "Issue analytics for Jira-style exports (cycle time, rollups, trends)",
    long_about = None,
    after_help = "Analytics run against a cached session; import an export first."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a raw export into a session cache
    Import(ImportArgs),

    /// List cached issues
    List(QueryArgs),

    /// Per-dimension rollups (alias: agg)
    #[command(alias = "agg")]
    Stats(StatsArgs),

    /// Monthly trend series
    Trend(TrendArgs),

    /// Cycle-time percentiles (P50/P75/P90)
    Percentiles(QueryArgs),

    /// Inspect or clear session caches
    Session(SessionCommand),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Raw export file (JSON array, search response, or JSONL pages)
    pub file: PathBuf,

    /// Session cache to write (default from config)
    #[arg(long, env = "ISSUELENS_SESSION")]
    pub session: Option<String>,
}

/// Filter flags shared by every analytics command. Different fields
/// combine with AND; repeated values of one flag combine with OR.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Filter by issue type (repeatable)
    #[arg(long = "type", value_name = "TYPE")]
    pub type_: Vec<String>,

    /// Filter by status (repeatable)
    #[arg(long)]
    pub status: Vec<String>,

    /// Filter by assignee display name (repeatable)
    #[arg(long)]
    pub assignee: Vec<String>,

    /// Filter by label; an issue matches on any of its labels
    #[arg(long)]
    pub label: Vec<String>,

    /// Start of the date window, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// End of the date window, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Require the resolution date inside the window as well
    #[arg(long)]
    pub resolved_in_range: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Session cache to read (default from config)
    #[arg(long, env = "ISSUELENS_SESSION")]
    pub session: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Group-by dimension: assignee, label, type, status
    #[arg(long, default_value = "assignee")]
    pub by: Dimension,

    /// Sort key: count, story-points, avg-points, rate
    #[arg(long, default_value = "count")]
    pub sort: SortKey,
}

#[derive(Args, Debug)]
pub struct TrendArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Break out per-assignee metrics for this assignee (repeatable)
    #[arg(long, value_name = "ASSIGNEE")]
    pub track: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SessionCommand {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionSubcommand {
    /// Show session cache metadata
    Show {
        /// Session name (default from config)
        session: Option<String>,
    },

    /// Drop a session cache
    Clear {
        /// Session name (default from config)
        session: Option<String>,
    },
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Import(args)) => commands::import::execute(&config, &args, cli.json),
        Some(Commands::List(args)) => commands::list::execute(&config, &args, cli.json),
        Some(Commands::Stats(args)) => commands::stats::execute(&config, &args, cli.json),
        Some(Commands::Trend(args)) => commands::trend::execute(&config, &args, cli.json),
        Some(Commands::Percentiles(args)) => {
            commands::percentiles::execute(&config, &args, cli.json)
        }
        Some(Commands::Session(cmd)) => commands::session::execute(&config, &cmd, cli.json),
        Some(Commands::Version) => commands::version::execute(cli.json),
        None => {
            println!("ilens - issue analytics. Use --help for usage.");
            Ok(())
        }
    }
}
