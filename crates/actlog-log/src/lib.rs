//! Activity log files.
//!
//! Reads the tab-separated weekly logs written by the window logger, in the
//! current format or the legacy one, and finds them on disk.
//!
//! A log line records when an observation started but not how long it lasted;
//! each record runs until the next one starts, and the last record of a file
//! runs to the end of its day.

mod folder;
mod line;

use std::fs;
use std::path::{Path, PathBuf};

use actlog_core::Record;
use chrono::NaiveTime;
use thiserror::Error;

pub use folder::{LogFolder, log_file_name, week_start};
pub use line::{HEADER_TEXT, parse_line, to_log_line};

/// Errors from reading log files.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log folder {} is not a directory", .0.display())]
    InvalidFolder(PathBuf),

    #[error("invalid log file pattern")]
    Pattern(#[from] regex::Error),
}

/// Reads all records of a log file.
pub fn read_records(path: &Path) -> Result<Vec<Record>, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text);
    tracing::debug!(path = %path.display(), records = records.len(), "read log file");
    Ok(records)
}

/// Parses log text into records with their durations filled in.
///
/// Headings keep zero seconds; the record before a heading runs on to the
/// next non-heading record.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    let mut open: Option<usize> = None;

    for (number, line) in text.lines().enumerate() {
        let Some(record) = parse_line(line) else {
            tracing::debug!(line = number + 1, "skipping unparsable log line");
            continue;
        };
        if !record.is_heading() {
            if let Some(index) = open {
                records[index].set_stop(record.start);
            }
            open = Some(records.len());
        }
        records.push(record);
    }

    if let Some(index) = open {
        let last = &mut records[index];
        if let Some(next_day) = last.date().succ_opt() {
            last.set_stop(next_day.and_time(NaiveTime::MIN));
        }
    }

    records
}

/// Fills the window of inactive legacy records from the record before them.
///
/// The legacy logger wrote idle periods without the window they interrupted.
pub fn convert_legacy(records: &mut [Record]) {
    for index in 1..records.len() {
        let (before, after) = records.split_at_mut(index);
        let (prev, next) = (&before[index - 1], &mut after[0]);
        if !next.active && !next.is_heading() {
            next.hwnd = prev.hwnd;
            next.title.clone_from(&prev.title);
            next.app.clone_from(&prev.app);
        }
    }
}
