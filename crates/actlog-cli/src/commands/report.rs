//! Report command: the weekly time card.
//!
//! Renders booked project hours as a box-drawn card with one column per
//! weekday, or as JSON with `--json`.

use std::io::Write;
use std::path::Path;

use actlog_core::TimeEntry;
use actlog_log::week_start;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::Config;
use crate::commands::util::{analyze_file, resolve_logfile};
use crate::project::{NUM_OF_DAYS, Project, ProjectSpec, book_entries, round_tenths};

const COL_WIDTH_FIRST: usize = 42;
const COL_WIDTH_WEEKDAY: usize = 7;
const COL_WIDTH_TOTAL: usize = 7;
const WEEKDAYS: [&str; NUM_OF_DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Projects booked for one week.
#[derive(Debug)]
pub struct TimeCard {
    /// Monday of the reported week, when there was any time.
    pub week_start: Option<NaiveDate>,
    /// Sorted by row label.
    pub projects: Vec<Project>,
}

impl TimeCard {
    pub fn new(specs: &[ProjectSpec], entries: &[TimeEntry]) -> Self {
        let mut projects = book_entries(specs, entries);
        projects.sort_by(|a, b| a.long_name.cmp(&b.long_name));
        Self {
            week_start: entries.first().map(|entry| week_start(entry.start.date())),
            projects,
        }
    }

    /// Hours per weekday over working projects.
    pub fn totals(&self) -> [f64; NUM_OF_DAYS] {
        let mut totals = [0.0; NUM_OF_DAYS];
        for project in self.projects.iter().filter(|p| p.working) {
            for (total, hours) in totals.iter_mut().zip(project.hours()) {
                *total += hours;
            }
        }
        totals.map(round_tenths)
    }
}

// ========== Time Card ==========

fn rule_line(left: char, middle: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    line.push_str(&"─".repeat(COL_WIDTH_FIRST));
    line.push(middle);
    for _ in 0..NUM_OF_DAYS {
        line.push_str(&"─".repeat(COL_WIDTH_WEEKDAY));
        line.push(middle);
    }
    line.push_str(&"─".repeat(COL_WIDTH_TOTAL));
    line.push(right);
    line
}

/// `title` must already be padded to the first column's width.
fn row<S: AsRef<str>>(title: &str, cells: &[S], total: &str) -> String {
    let mut line = format!("│{title}│");
    for cell in cells {
        line.push_str(&format!("{:^COL_WIDTH_WEEKDAY$}│", cell.as_ref()));
    }
    line.push_str(&format!("{total:^COL_WIDTH_TOTAL$}│"));
    line
}

fn hours_row(title: &str, hours: &[f64; NUM_OF_DAYS], hide_zeros: bool) -> String {
    let cells = hours.map(|hrs| {
        if hide_zeros && hrs == 0.0 {
            String::new()
        } else {
            format!("{hrs:4.1} ")
        }
    });
    let total: f64 = hours.iter().sum();
    let title = if hide_zeros {
        format!("{title:<COL_WIDTH_FIRST$.COL_WIDTH_FIRST$}")
    } else {
        format!("{title:>COL_WIDTH_FIRST$}")
    };
    row(&title, cells.as_slice(), &format!("{total:5.1}"))
}

/// Formats the human-readable time card.
pub fn format_time_card(card: &TimeCard) -> String {
    let mut lines = vec![rule_line('┌', '┬', '┐')];

    if let Some(monday) = card.week_start {
        let dates: Vec<String> = (0..7)
            .map(|day| (monday + Duration::days(day)).format("%m-%d").to_string())
            .collect();
        lines.push(row(&" ".repeat(COL_WIDTH_FIRST), dates.as_slice(), ""));
    }
    lines.push(row(
        &format!("{:<COL_WIDTH_FIRST$}", "Project"),
        WEEKDAYS.as_slice(),
        "Total",
    ));
    lines.push(rule_line('├', '┼', '┤'));

    for project in &card.projects {
        lines.push(hours_row(&project.long_name, &project.hours(), true));
    }

    lines.push(rule_line('├', '┼', '┤'));
    lines.push(hours_row("Totals: ", &card.totals(), false));
    lines.push(rule_line('└', '┴', '┘'));

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub week_start: Option<String>,
    pub projects: Vec<JsonProject>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonProject {
    pub name: String,
    pub long_name: String,
    pub working: bool,
    pub hours: [f64; NUM_OF_DAYS],
    pub total_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub hours: [f64; NUM_OF_DAYS],
    pub total_hours: f64,
}

/// Formats the time card as JSON.
pub fn format_time_card_json(card: &TimeCard) -> Result<String> {
    let totals = card.totals();
    let report = JsonReport {
        week_start: card
            .week_start
            .map(|monday| monday.format("%Y-%m-%d").to_string()),
        projects: card
            .projects
            .iter()
            .map(|project| JsonProject {
                name: project.name.clone(),
                long_name: project.long_name.clone(),
                working: project.working,
                hours: project.hours(),
                total_hours: project.total_hours(),
            })
            .collect(),
        totals: JsonTotals {
            hours: totals,
            total_hours: round_tenths(totals.iter().sum()),
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    logfile: Option<&Path>,
    json: bool,
) -> Result<()> {
    let path = resolve_logfile(config, logfile)?;
    let output = analyze_file(config, &path)?;
    let card = TimeCard::new(&config.projects, &output.entries);

    if json {
        writeln!(writer, "{}", format_time_card_json(&card)?)?;
    } else {
        write!(writer, "{}", format_time_card(&card))?;
    }

    Ok(())
}
