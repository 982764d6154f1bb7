//! Step engine: collapses matched spans of records into single tagged records.
//!
//! # Algorithm
//!
//! 1. From the cursor, find the first record that satisfies the `first` criteria
//!    (including its `started_at` window). It opens a candidate span.
//! 2. From that record, scan forward judging every record against the `last`
//!    criteria. An accepted record becomes the new span end but the scan goes on
//!    looking for a later one. A day change, an exceeded `duration.max` or a broken
//!    `continuous` requirement stops the scan; so does the end of the list.
//! 3. A span with an end is kept and the cursor moves past it. A span without one
//!    is dropped and the cursor moves one record past its start.
//! 4. With `one_per_day`, of two spans on the same day the one selected by the
//!    policy is dropped, repeatedly, until each day has one span.
//! 5. Every surviving span is replaced by its first record, stretched to the last
//!    record's stop and tagged with the step's activity.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::criteria::{Continuity, Criteria, CriteriaSpec, Intermittent};
use crate::record::Record;
use crate::types::ValidationError;

/// A step as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    /// Tag applied to each collapsed span.
    pub activity: String,

    #[serde(default)]
    pub first: CriteriaSpec,

    #[serde(default)]
    pub last: CriteriaSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_per_day: Option<OnePerDay>,
}

/// Which span to drop when two fall on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnePerDay {
    /// Drop the shorter span.
    Shortest,
    /// Drop the longer span.
    Longest,
}

/// A matched span of records, by index into the list it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub first: usize,
    pub last: usize,
    /// Calendar day of the first record.
    pub date: NaiveDate,
    /// From the first record's start to the last record's stop.
    pub duration: Duration,
}

impl Activity {
    fn new(records: &[Record], first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            date: records[first].date(),
            duration: records[last].stop() - records[first].start,
        }
    }
}

/// How a record relates to the span being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Can end the span; keep scanning for a later end.
    Accept,
    /// Cannot end the span; keep scanning.
    Reject,
    /// Cannot end the span and nothing after it can.
    Stop,
}

/// A compiled step.
#[derive(Debug, Clone)]
pub struct Step {
    activity: String,
    first: Criteria,
    last: Criteria,
    one_per_day: Option<OnePerDay>,
}

impl Step {
    pub fn new(spec: &StepSpec) -> Result<Self, ValidationError> {
        if spec.activity.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "step activity",
            });
        }
        Ok(Self {
            activity: spec.activity.clone(),
            first: Criteria::compile(&spec.first),
            last: Criteria::compile(&spec.last),
            one_per_day: spec.one_per_day,
        })
    }

    /// Finds the spans this step would collapse, after one-per-day resolution.
    pub fn find_activities(&self, records: &[Record]) -> Vec<Activity> {
        let mut activities = Vec::new();
        let mut cursor = 0;

        while let Some(first) = self.find_first(records, cursor) {
            if let Some(last) = self.find_last(records, first) {
                activities.push(Activity::new(records, first, last));
                cursor = last + 1;
            } else {
                cursor = first + 1;
            }
        }

        if let Some(policy) = self.one_per_day {
            resolve_one_per_day(&mut activities, policy);
        }
        activities
    }

    /// Applies the step, returning the narrowed list of records.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let activities = self.find_activities(&records);
        tracing::debug!(
            activity = %self.activity,
            spans = activities.len(),
            "applying step"
        );
        if activities.is_empty() {
            return records;
        }

        let mut collapsed = Vec::with_capacity(records.len());
        let mut remaining = records.into_iter();
        let mut position = 0;

        for activity in &activities {
            collapsed.extend(remaining.by_ref().take(activity.first - position));

            let mut span = remaining.by_ref().take(activity.last - activity.first + 1);
            let Some(mut survivor) = span.next() else {
                break;
            };
            if let Some(stop) = span.last().map(|record| record.stop()) {
                survivor.set_stop(stop);
            }
            survivor.activity.clone_from(&self.activity);
            collapsed.push(survivor);

            position = activity.last + 1;
        }

        collapsed.extend(remaining);
        collapsed
    }

    fn find_first(&self, records: &[Record], from: usize) -> Option<usize> {
        records
            .iter()
            .skip(from)
            .position(|record| !record.is_heading() && self.first.opens_span(record))
            .map(|offset| from + offset)
    }

    fn find_last(&self, records: &[Record], first: usize) -> Option<usize> {
        let first_record = &records[first];
        let mut last = None;

        for (index, record) in records.iter().enumerate().skip(first) {
            match self.judge_last(first_record, record) {
                Verdict::Accept => last = Some(index),
                Verdict::Reject => {}
                Verdict::Stop => break,
            }
        }
        last
    }

    fn judge_last(&self, first: &Record, record: &Record) -> Verdict {
        if record.is_heading() {
            return Verdict::Reject;
        }

        // A span never crosses midnight.
        if record.date() != first.date() {
            return Verdict::Stop;
        }

        if let Some(window) = &self.last.duration {
            let span = record.stop() - first.start;
            if window.is_too_long(span) {
                return Verdict::Stop;
            }
            if window.is_too_short(span) {
                return Verdict::Reject;
            }
        }

        let continuous = match &self.last.continuity {
            Continuity::Off => true,
            Continuity::All => self.first.matches(record),
            Continuity::Only(kinds) => self.first.matches_only(record, kinds),
        };
        if !continuous {
            return Verdict::Stop;
        }

        if !self.last.matches(record) {
            return Verdict::Reject;
        }

        match self.last.intermittent {
            Some(Intermittent::ExactTitle) if record.title != first.title => Verdict::Reject,
            _ => Verdict::Accept,
        }
    }
}

/// Drops same-day spans until each day keeps one. Ties keep the earlier span.
fn resolve_one_per_day(activities: &mut Vec<Activity>, policy: OnePerDay) {
    let mut index = 0;
    while index + 1 < activities.len() {
        let (prev, next) = (&activities[index], &activities[index + 1]);
        if prev.date != next.date {
            index += 1;
            continue;
        }

        let drop_prev = match policy {
            OnePerDay::Shortest => prev.duration < next.duration,
            OnePerDay::Longest => prev.duration > next.duration,
        };
        activities.remove(if drop_prev { index } else { index + 1 });
    }
}
