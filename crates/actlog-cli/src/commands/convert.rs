//! Convert command: rewrite a legacy log file in the current format.

use std::fs;
use std::io::Write;
use std::path::Path;

use actlog_log::{convert_legacy, parse_line, to_log_line};
use anyhow::{Context, Result};

/// Converts legacy log text to current-format text.
///
/// Lines that parse as neither format are dropped.
pub fn convert_text(text: &str) -> String {
    let mut records: Vec<_> = text.lines().filter_map(parse_line).collect();
    convert_legacy(&mut records);
    records
        .iter()
        .map(|record| to_log_line(record) + "\n")
        .collect()
}

/// Runs the convert command, writing to `output` or else to `writer`.
pub fn run<W: Write>(writer: &mut W, input: &Path, output: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let converted = convert_text(&text);

    match output {
        Some(path) => {
            fs::write(path, &converted)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                input = %input.display(),
                output = %path.display(),
                lines = converted.lines().count(),
                "converted log file"
            );
        }
        None => write!(writer, "{converted}")?,
    }

    Ok(())
}
