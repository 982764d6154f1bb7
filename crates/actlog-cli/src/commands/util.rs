//! Shared utilities for CLI commands.

use std::path::{Path, PathBuf};

use actlog_core::{Analysis, AnalysisOutput};
use actlog_log::LogFolder;
use anyhow::{Context, Result};

use crate::Config;

/// Returns `logfile`, or the newest log file in the configured folder.
pub fn resolve_logfile(config: &Config, logfile: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = logfile {
        return Ok(path.to_path_buf());
    }

    let folder = LogFolder::new(&config.log_folder);
    let latest = folder
        .latest(&config.user)
        .with_context(|| format!("failed to list {}", config.log_folder.display()))?;
    let Some(path) = latest else {
        anyhow::bail!(
            "no log files for user '{}' in {}",
            config.user,
            config.log_folder.display()
        );
    };
    tracing::debug!(path = %path.display(), "using newest log file");
    Ok(path)
}

/// Reads a log file and runs the configured analysis over it.
pub fn analyze_file(config: &Config, path: &Path) -> Result<AnalysisOutput> {
    let analysis = Analysis::new(&config.analysis).context("invalid analysis configuration")?;
    let records = actlog_log::read_records(path)?;
    Ok(analysis.run(records))
}

/// Formats seconds as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Ym" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
