//! Logs command: list recent weekly log files.

use std::io::Write;

use actlog_log::LogFolder;
use anyhow::{Context, Result};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, count: Option<usize>) -> Result<()> {
    let count = count.unwrap_or(config.recent_weeks);
    let folder = LogFolder::new(&config.log_folder);
    let weeks = folder
        .recent(&config.user, count)
        .with_context(|| format!("failed to list {}", config.log_folder.display()))?;

    if weeks.is_empty() {
        writeln!(
            writer,
            "No log files for {} in {}",
            config.user,
            config.log_folder.display()
        )?;
        return Ok(());
    }

    writeln!(writer, "Week of      Log file")?;
    for (week, path) in weeks {
        writeln!(writer, "{}  {}", week.format("%Y-%m-%d"), path.display())?;
    }

    Ok(())
}
