//! Weekly log file discovery.
//!
//! The logger writes one file per user and week, named after the Monday
//! that starts the week: `{user}-YYYY-MM-DD.tab`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

use crate::LogError;

const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Name of the log file covering the week that contains `date`.
pub fn log_file_name(user: &str, date: NaiveDate) -> String {
    format!("{user}-{}.tab", week_start(date).format(FILE_DATE_FORMAT))
}

/// A folder holding weekly log files.
#[derive(Debug, Clone)]
pub struct LogFolder {
    path: PathBuf,
}

impl LogFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finds every log file of `user`, keyed by the first day of its week.
    pub fn find_all(&self, user: &str) -> Result<BTreeMap<NaiveDate, PathBuf>, LogError> {
        if !self.path.is_dir() {
            return Err(LogError::InvalidFolder(self.path.clone()));
        }
        let pattern = Regex::new(&format!(
            r"^{}-(\d{{4}}-\d\d-\d\d)\.tab$",
            regex::escape(user)
        ))?;

        let entries = fs::read_dir(&self.path).map_err(|source| LogError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut logfiles = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| LogError::Io {
                path: self.path.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(caps) = file_name.to_str().and_then(|name| pattern.captures(name)) else {
                continue;
            };
            match NaiveDate::parse_from_str(&caps[1], FILE_DATE_FORMAT) {
                Ok(week) => {
                    logfiles.insert(week, entry.path());
                }
                Err(err) => {
                    tracing::debug!(file = ?entry.path(), %err, "skipping log file with invalid date");
                }
            }
        }

        tracing::debug!(folder = ?self.path, count = logfiles.len(), "found log files");
        Ok(logfiles)
    }

    /// Returns up to `count` log files of `user`, newest week first.
    pub fn recent(&self, user: &str, count: usize) -> Result<Vec<(NaiveDate, PathBuf)>, LogError> {
        Ok(self
            .find_all(user)?
            .into_iter()
            .rev()
            .take(count)
            .collect())
    }

    /// The newest log file of `user`, if any.
    pub fn latest(&self, user: &str) -> Result<Option<PathBuf>, LogError> {
        Ok(self.recent(user, 1)?.into_iter().next().map(|(_, path)| path))
    }
}
