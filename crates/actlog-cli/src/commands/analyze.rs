//! Analyze command: classify a log file and list its time entries.

use std::io::Write;
use std::path::Path;

use actlog_core::{AnalysisOutput, Record};
use anyhow::Result;

use crate::Config;
use crate::commands::util::{analyze_file, format_duration, resolve_logfile};

/// Formats time entries followed by a totals line.
pub fn format_entries(output: &AnalysisOutput) -> String {
    let mut text = String::new();
    for entry in &output.entries {
        text.push_str(&entry.to_string());
        text.push('\n');
    }
    text.push_str(&format!(
        "Total: {}  Paid: {}\n",
        format_duration(output.total_seconds()),
        format_duration(output.paid_seconds())
    ));
    text
}

fn format_record(record: &Record) -> String {
    format!(
        "{} {:6} {:<10} {}",
        record.start.format("%Y-%m-%d %H:%M:%S"),
        record.seconds,
        record.action.as_str(),
        record.name()
    )
}

/// Formats the classified and collapsed records, one per line.
pub fn format_records(output: &AnalysisOutput) -> String {
    output
        .records
        .iter()
        .filter(|record| !record.is_heading())
        .map(|record| format_record(record) + "\n")
        .collect()
}

/// Runs the analyze command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    logfile: Option<&Path>,
    records: bool,
) -> Result<()> {
    let path = resolve_logfile(config, logfile)?;
    let output = analyze_file(config, &path)?;

    if records {
        write!(writer, "{}", format_records(&output))?;
    } else {
        write!(writer, "{}", format_entries(&output))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    const LOG: &str = "\
2024-03-04 09:00:00\tactive\t00000010\tInbox - Outlook\toutlook.exe
2024-03-04 09:20:00\tactive\t00000020\tTeams meeting\tteams.exe
2024-03-04 09:50:00\tactive\t00000030\tSlack\tslack.exe
2024-03-04 09:52:00\tactive\t00000020\tTeams meeting\tteams.exe
2024-03-04 10:30:00\tactive\t00000040\tlib.rs - VS Code\tcode.exe
2024-03-04 11:00:00\tinactive\t--------\t\t
";

    const ANALYSIS: &str = r#"{
        "rules": [
            {"name": "Email", "regex": "outlook"},
            {"name": "Meeting", "regex": "teams", "action": "collapse"},
            {"name": "Coding", "regex": "vs code"},
            {"name": "Away", "regex": "^$", "action": "remove"}
        ]
    }"#;

    fn run_on_sample(records: bool) -> String {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nelson-2024-03-04.tab");
        std::fs::write(&path, LOG).unwrap();

        let config = Config {
            analysis: serde_json::from_str(ANALYSIS).unwrap(),
            ..Config::default()
        };
        let mut output = Vec::new();
        run(&mut output, &config, Some(&path), records).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_analyze_prints_time_entries() {
        assert_snapshot!(run_on_sample(false), @r"
        2024-03-04 09:00:00  1200   Email
        2024-03-04 09:20:00  4200   Meeting
        2024-03-04 10:30:00  1800   Coding
        2024-03-04 11:00:00 46800   Away
        Total: 15h 0m  Paid: 2h 0m
        ");
    }

    #[test]
    fn test_analyze_prints_records() {
        assert_snapshot!(run_on_sample(true), @r"
        2024-03-04 09:00:00   1200 sequential Email
        2024-03-04 09:20:00   1800 collapse   Meeting
        2024-03-04 09:50:00    120 sequential Unknown Task
        2024-03-04 09:52:00   2280 collapse   Meeting
        2024-03-04 10:30:00   1800 sequential Coding
        2024-03-04 11:00:00  46800 remove     Away
        ");
    }
}
