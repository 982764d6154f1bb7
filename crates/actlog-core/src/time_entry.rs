//! Time-entry grouping.
//!
//! Classified records are merged greedily into [`TimeEntry`] values:
//! - A gap larger than `max_gap_seconds` between two records always ends an entry.
//! - A `collapse` entry extends through records with its name until its span would
//!   exceed `max_collapse_seconds`. Differently named records inside the span are
//!   absorbed as interruptions (or end the entry with [`CollapsePolicy::Contiguous`]).
//! - Any other entry extends only through an unbroken run of records with its name.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::{Action, Record};
use crate::types::ValidationError;

/// How a `collapse` entry treats differently named records within its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsePolicy {
    /// Skip over them; a later record with the entry's name extends the entry.
    #[default]
    SkipInterruptions,
    /// End the entry at the first of them.
    Contiguous,
}

/// Thresholds for grouping records into time entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupingConfig {
    /// Largest stop-to-start gap between records of one entry. Default: 3.
    pub max_gap_seconds: i64,

    /// Longest span of a `collapse` entry. Default: 9000 (2.5 hours).
    pub max_collapse_seconds: i64,

    pub collapse: CollapsePolicy,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: 3,
            max_collapse_seconds: 9000,
            collapse: CollapsePolicy::default(),
        }
    }
}

impl GroupingConfig {
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.max_gap_seconds < 0 {
            return Err(ValidationError::Negative {
                field: "max_gap_seconds",
                value: self.max_gap_seconds,
            });
        }
        if self.max_collapse_seconds < 0 {
            return Err(ValidationError::Negative {
                field: "max_collapse_seconds",
                value: self.max_collapse_seconds,
            });
        }
        Ok(())
    }
}

/// A named, duration-summed unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    /// Index of the entry's first record.
    pub index: usize,
    /// Index of the first record after the entry.
    pub next_index: usize,
    pub start: NaiveDateTime,
    pub seconds: i64,
    pub name: String,
    pub action: Action,
}

impl TimeEntry {
    /// Starts an entry holding only the record at `index`.
    pub fn new(index: usize, record: &Record) -> Self {
        Self {
            index,
            next_index: index + 1,
            start: record.start,
            seconds: record.seconds,
            name: record.name().to_string(),
            action: record.action,
        }
    }

    pub fn stop(&self) -> NaiveDateTime {
        self.start + Duration::seconds(self.seconds)
    }

    /// Day of the week the entry started, Monday = 0.
    pub fn weekday(&self) -> u32 {
        self.start.weekday().num_days_from_monday()
    }

    pub fn is_paid_hours(&self) -> bool {
        self.action != Action::Remove
    }

    /// Extends the entry over the records that belong to it.
    ///
    /// Returns the index of the first record of the next entry.
    pub fn find_next_index(&mut self, records: &[Record], config: &GroupingConfig) -> usize {
        let first = &records[self.index];
        let mut last = first;
        let mut last_index = self.index;
        let mut prev_stop = first.stop();

        for (index, record) in records.iter().enumerate().skip(self.index + 1) {
            if record.is_heading() {
                prev_stop = prev_stop.max(record.stop());
                continue;
            }

            // Never span an entry across missing data.
            let gap = (record.start - prev_stop).num_seconds();
            if gap.abs() > config.max_gap_seconds {
                break;
            }
            prev_stop = record.stop();

            if first.action == Action::Collapse {
                let span = (record.stop() - first.start).num_seconds();
                if span > config.max_collapse_seconds {
                    break;
                }
                if record.name() == first.name() {
                    last = record;
                    last_index = index;
                } else if config.collapse == CollapsePolicy::Contiguous {
                    break;
                }
            } else {
                if record.name() != first.name() {
                    break;
                }
                last = record;
                last_index = index;
            }
        }

        self.seconds = (last.stop() - first.start).num_seconds();
        self.next_index = last_index + 1;
        self.next_index
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:6}   {}",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.seconds,
            self.name
        )
    }
}

/// Groups classified records into time entries, skipping heading rows.
pub fn group_entries(records: &[Record], config: &GroupingConfig) -> Vec<TimeEntry> {
    let mut entries = Vec::new();
    let mut index = 0;

    while index < records.len() {
        if records[index].is_heading() {
            index += 1;
            continue;
        }
        let mut entry = TimeEntry::new(index, &records[index]);
        index = entry.find_next_index(records, config);
        entries.push(entry);
    }

    entries
}
