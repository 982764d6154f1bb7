//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Activity log analyzer.
///
/// Turns the weekly window-activity logs into named time entries and a
/// weekly time card.
#[derive(Debug, Parser)]
#[command(name = "actlog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (TOML or JSON).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify a log file and print its time entries.
    Analyze {
        /// Log file to analyze. Defaults to the newest one in the log folder.
        logfile: Option<PathBuf>,

        /// Print the collapsed records instead of the time entries.
        #[arg(long)]
        records: bool,
    },

    /// Print the weekly time card for a log file.
    Report {
        /// Log file to report on. Defaults to the newest one in the log folder.
        logfile: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the most recent weekly log files.
    Logs {
        /// Number of weeks to list. Defaults to `recent_weeks` from config.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Rewrite a legacy log file in the current format.
    Convert {
        /// Legacy log file.
        input: PathBuf,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
