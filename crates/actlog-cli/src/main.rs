use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use actlog_cli::commands::{analyze, convert, logs, report};
use actlog_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_path {
        anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
    }
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Analyze { logfile, records }) => {
            let config = load_config(cli.config.as_deref())?;
            analyze::run(&mut out, &config, logfile.as_deref(), *records)?;
        }
        Some(Commands::Report { logfile, json }) => {
            let config = load_config(cli.config.as_deref())?;
            report::run(&mut out, &config, logfile.as_deref(), *json)?;
        }
        Some(Commands::Logs { count }) => {
            let config = load_config(cli.config.as_deref())?;
            logs::run(&mut out, &config, *count)?;
        }
        Some(Commands::Convert { input, output }) => {
            // Convert doesn't need config - just rewrites one file
            convert::run(&mut out, input, output.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
