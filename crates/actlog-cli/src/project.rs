//! Projects on the weekly time card.
//!
//! Paid time entries are summed per project and weekday. An entry whose name
//! matches no configured project gets an ad-hoc project named after it.
//! A project with `distribute` then hands its time to the listed projects,
//! in proportion to their totals (equally when they are all zero). Each
//! target spreads what it receives over its own weekday pattern, or over
//! Monday to Friday when it has none.

use actlog_core::TimeEntry;
use serde::{Deserialize, Serialize};

pub const NUM_OF_DAYS: usize = 7;
const SECONDS_PER_HOUR: f64 = 3600.0;
const WORK_WEEK: [f64; NUM_OF_DAYS] = [0.2, 0.2, 0.2, 0.2, 0.2, 0.0, 0.0];

/// A project as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSpec {
    /// Time entry name that is booked to this project.
    pub name: String,

    /// Row label on the time card. Defaults to `name`.
    #[serde(default)]
    pub long_name: String,

    /// Whether the hours count toward the card totals.
    #[serde(default = "default_working")]
    pub working: bool,

    /// Projects that receive this project's time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distribute: Vec<String>,
}

const fn default_working() -> bool {
    true
}

/// Seconds booked to one project, per weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub long_name: String,
    pub working: bool,
    pub distribute: Vec<String>,
    seconds: [f64; NUM_OF_DAYS],
    total: f64,
}

impl Project {
    pub fn new(spec: &ProjectSpec) -> Self {
        let long_name = if spec.long_name.is_empty() {
            spec.name.clone()
        } else {
            spec.long_name.clone()
        };
        Self {
            name: spec.name.clone(),
            long_name,
            working: spec.working,
            distribute: spec.distribute.clone(),
            seconds: [0.0; NUM_OF_DAYS],
            total: 0.0,
        }
    }

    fn ad_hoc(name: &str) -> Self {
        Self::new(&ProjectSpec {
            name: name.to_string(),
            long_name: String::new(),
            working: true,
            distribute: Vec::new(),
        })
    }

    #[expect(clippy::cast_precision_loss, reason = "entry durations are far below 2^52 seconds")]
    pub fn add_entry(&mut self, entry: &TimeEntry) {
        let seconds = entry.seconds as f64;
        self.seconds[entry.weekday() as usize] += seconds;
        self.total += seconds;
    }

    pub fn clear_seconds(&mut self) {
        self.seconds = [0.0; NUM_OF_DAYS];
        self.total = 0.0;
    }

    /// Adds seconds spread by this project's weekday ratio.
    pub fn distribute_seconds(&mut self, seconds: f64) {
        let ratio = if self.total > 0.0 {
            self.seconds.map(|day| day / self.total)
        } else {
            WORK_WEEK
        };
        for (day, share) in self.seconds.iter_mut().zip(ratio) {
            *day += share * seconds;
        }
        self.total += seconds;
    }

    pub const fn total_seconds(&self) -> f64 {
        self.total
    }

    /// Hours per weekday, rounded to one decimal.
    pub fn hours(&self) -> [f64; NUM_OF_DAYS] {
        self.seconds.map(|seconds| round_tenths(seconds / SECONDS_PER_HOUR))
    }

    pub fn total_hours(&self) -> f64 {
        round_tenths(self.total / SECONDS_PER_HOUR)
    }
}

/// Rounds to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Books paid entries to projects and applies `distribute`.
///
/// Returns the projects that ended up with time, in configuration order
/// followed by ad-hoc projects in order of first appearance.
pub fn book_entries(specs: &[ProjectSpec], entries: &[TimeEntry]) -> Vec<Project> {
    let mut projects: Vec<Project> = specs.iter().map(Project::new).collect();

    for entry in entries.iter().filter(|entry| entry.is_paid_hours()) {
        let index = match projects.iter().position(|p| p.name == entry.name) {
            Some(index) => index,
            None => {
                projects.push(Project::ad_hoc(&entry.name));
                projects.len() - 1
            }
        };
        projects[index].add_entry(entry);
    }

    for source in 0..projects.len() {
        distribute(&mut projects, source);
    }

    projects.retain(|project| project.total_seconds() > 0.0);
    projects
}

#[expect(clippy::cast_precision_loss, reason = "target counts are tiny")]
fn distribute(projects: &mut [Project], source: usize) {
    let seconds = projects[source].total_seconds();
    if projects[source].distribute.is_empty() || seconds == 0.0 {
        return;
    }

    let targets: Vec<usize> = projects[source]
        .distribute
        .iter()
        .filter_map(|name| {
            let found = projects
                .iter()
                .position(|p| &p.name == name)
                .filter(|&index| index != source);
            if found.is_none() {
                tracing::warn!(project = %projects[source].name, to = %name, "unknown distribute target");
            }
            found
        })
        .collect();
    if targets.is_empty() {
        return;
    }

    let weights: Vec<f64> = targets
        .iter()
        .map(|&index| projects[index].total_seconds())
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    let count = targets.len() as f64;

    for (&index, weight) in targets.iter().zip(weights) {
        let share = if weight_sum > 0.0 {
            weight / weight_sum
        } else {
            1.0 / count
        };
        projects[index].distribute_seconds(seconds * share);
    }
    projects[source].clear_seconds();
    tracing::debug!(project = %projects[source].name, seconds, "distributed project time");
}
