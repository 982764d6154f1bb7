//! End-to-end integration tests for the complete analysis flow.
//!
//! Tests the full pipeline: log folder → classify → steps → time entries → time card,
//! driving the `actlog` binary the way a user would.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn actlog_binary() -> String {
    env!("CARGO_BIN_EXE_actlog").to_string()
}

const WEEK_LOG: &str = "\
Time\tUser_Active\tWindow_Handle\tTitle\tApplication
2024-03-04 09:00:00\tactive\t00000010\tInbox - Outlook\toutlook.exe
2024-03-04 09:30:00\tactive\t00000020\tStandup - Teams\tteams.exe
2024-03-04 09:45:00\tactive\t00000030\tlib.rs - VS Code\tcode.exe
2024-03-04 12:00:00\tactive\t00000040\tYouTube - Firefox\tfirefox.exe
2024-03-04 12:20:00\tactive\t00000040\tYouTube - Firefox\tfirefox.exe
2024-03-04 12:45:00\tactive\t00000030\tlib.rs - VS Code\tcode.exe
2024-03-04 17:00:00\tinactive\t--------\t\t
2024-03-05 09:00:00\tactive\t00000030\tmain.rs - VS Code\tcode.exe
2024-03-05 11:00:00\tinactive\t--------\t\t
";

const CONFIG: &str = r#"
user = "nelson"
log_folder = "LOG_FOLDER"

[[analysis.rules]]
name = "Email"
regex = "outlook"

[[analysis.rules]]
name = "Meeting"
regex = "teams"
action = "collapse"

[[analysis.rules]]
name = "Development"
regex = "vs code"

[[analysis.rules]]
name = "Away"
regex = "^$"
action = "remove"

[[analysis.steps]]
activity = "Lunch"
first = { title = "youtube", started_at = { min = "11:30", max = "13:00" } }
last = { title = "youtube" }
one_per_day = "shortest"

[[projects]]
name = "Development"
long_name = "Product development"

[[projects]]
name = "Email"
distribute = ["Development"]

[[projects]]
name = "Lunch"
working = false
"#;

/// Lays out a home directory with a log folder and a config file.
fn setup() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let log_folder = temp.path().join("logs");
    std::fs::create_dir_all(&log_folder).unwrap();
    std::fs::write(log_folder.join("nelson-2024-02-26.tab"), "").unwrap();
    std::fs::write(log_folder.join("nelson-2024-03-04.tab"), WEEK_LOG).unwrap();

    let config_path = temp.path().join("actlog.toml");
    let config = CONFIG.replace("LOG_FOLDER", &log_folder.display().to_string());
    std::fs::write(&config_path, config).unwrap();
    (temp, config_path)
}

fn actlog(home: &Path, args: &[&str]) -> Output {
    Command::new(actlog_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run actlog")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "actlog should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_analyze_uses_newest_log() {
    let (temp, config) = setup();
    let output = actlog(
        temp.path(),
        &["analyze", "--config", config.to_str().unwrap()],
    );
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines,
        vec![
            "2024-03-04 09:00:00  1800   Email",
            "2024-03-04 09:30:00   900   Meeting",
            "2024-03-04 09:45:00  8100   Development",
            "2024-03-04 12:00:00  2700   Lunch",
            "2024-03-04 12:45:00 15300   Development",
            "2024-03-04 17:00:00 57600   Away",
            "2024-03-05 09:00:00  7200   Development",
            "2024-03-05 11:00:00 46800   Away",
            "Total: 39h 0m  Paid: 10h 0m",
        ]
    );
}

#[test]
fn test_analyze_records_shows_collapsed_step() {
    let (temp, config) = setup();
    let output = actlog(
        temp.path(),
        &["analyze", "--records", "--config", config.to_str().unwrap()],
    );
    let stdout = stdout_of(&output);

    // The two YouTube records became one tagged record.
    assert_eq!(stdout.lines().count(), 8);
    assert!(stdout.contains("2024-03-04 12:00:00   2700 sequential Lunch"));
}

#[test]
fn test_report_json() {
    let (temp, config) = setup();
    let output = actlog(
        temp.path(),
        &["report", "--json", "--config", config.to_str().unwrap()],
    );
    let stdout = stdout_of(&output);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["week_start"], "2024-03-04");
    let projects = report["projects"].as_array().unwrap();
    let names: Vec<&str> = projects
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    // Email was distributed into Development; sorted by long name.
    assert_eq!(names, vec!["Lunch", "Meeting", "Development"]);

    let development = &projects[2];
    assert_eq!(development["long_name"], "Product development");
    assert_eq!(development["total_hours"], 9.0);
    assert_eq!(report["totals"]["total_hours"], 9.3);
}

#[test]
fn test_report_time_card() {
    let (temp, config) = setup();
    let output = actlog(temp.path(), &["report", "-c", config.to_str().unwrap()]);
    let stdout = stdout_of(&output);

    assert!(stdout.starts_with('┌'));
    assert!(stdout.contains("│Product development"));
    assert!(stdout.contains("Totals: │"));
    assert!(stdout.contains(" 03-04 "));
}

#[test]
fn test_logs_lists_weeks() {
    let (temp, config) = setup();
    let output = actlog(
        temp.path(),
        &["logs", "-n", "5", "--config", config.to_str().unwrap()],
    );
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2024-03-04"));
    assert!(lines[2].starts_with("2024-02-26"));
}

#[test]
fn test_convert_then_analyze() {
    let (temp, config) = setup();
    let legacy = temp.path().join("legacy.tab");
    std::fs::write(
        &legacy,
        "\
2024-03-06 09:00:00\t0\tTitle\t\t
2024-03-06 09:00:00\t600\tInbox - Outlook\tC:\\Office\\OUTLOOK.EXE\t16
2024-03-06 09:10:00\t300\tIDLE\t\t0
2024-03-06 09:15:00\t60\tlib.rs - VS Code\tC:\\Code\\Code.exe\t48
",
    )
    .unwrap();
    let converted = temp.path().join("converted.tab");

    let output = actlog(
        temp.path(),
        &[
            "convert",
            legacy.to_str().unwrap(),
            "-o",
            converted.to_str().unwrap(),
        ],
    );
    stdout_of(&output);

    let output = actlog(
        temp.path(),
        &[
            "analyze",
            converted.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
    );
    let stdout = stdout_of(&output);
    // The idle period kept the Outlook window, so it is still Email.
    assert!(stdout.starts_with("2024-03-06 09:00:00   900   Email\n"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = actlog(temp.path(), &["logs", "--config", "/nonexistent/actlog.toml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = actlog(temp.path(), &[]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage"));
}
