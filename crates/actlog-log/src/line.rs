//! Single-line parsing and formatting.
//!
//! Current format, one observation per line:
//!
//! ```text
//! 2024-03-04 09:00:00<TAB>active<TAB>000A01F2<TAB>Inbox - Outlook<TAB>outlook.exe
//! ```
//!
//! Legacy format, with a stale duration column and a decimal handle last:
//!
//! ```text
//! 2024-03-04 09:00:00<TAB>120<TAB>Inbox - Outlook<TAB>C:\Office\OUTLOOK.EXE<TAB>655858
//! ```

use actlog_core::record::{HEADING_TITLE, IDLE_TITLE};
use actlog_core::{Record, normalize_app};
use chrono::NaiveDateTime;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ACTIVE: &str = "active";
const INACTIVE: &str = "inactive";
const NO_HWND: &str = "--------";

/// Column header written in place of heading rows.
pub const HEADER_TEXT: &str = "Time\tUser_Active\tWindow_Handle\tTitle\tApplication";

/// Parses a line in either format.
///
/// Returns `None` for header rows and malformed lines.
pub fn parse_line(line: &str) -> Option<Record> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    let [start, second, ..] = fields.as_slice() else {
        return None;
    };
    let start = NaiveDateTime::parse_from_str(start, DATETIME_FORMAT).ok()?;

    if *second == ACTIVE || *second == INACTIVE {
        parse_current(start, &fields)
    } else {
        parse_legacy(start, &fields)
    }
}

fn parse_current(start: NaiveDateTime, fields: &[&str]) -> Option<Record> {
    let [_, active, hwnd, title, app] = fields else {
        return None;
    };
    let hwnd = if *hwnd == NO_HWND {
        None
    } else {
        Some(u64::from_str_radix(hwnd, 16).ok()?)
    };
    Some(Record::new(start, 0, *active == ACTIVE, *title, *app).with_hwnd(hwnd))
}

fn parse_legacy(start: NaiveDateTime, fields: &[&str]) -> Option<Record> {
    let [_, _seconds, title, app, hwnd] = fields else {
        return None;
    };
    if *title == HEADING_TITLE {
        return Some(Record::heading(start));
    }
    if *title == IDLE_TITLE {
        return Some(Record::new(start, 0, false, "", ""));
    }
    let hwnd = match *hwnd {
        "" | "0" => None,
        text => Some(text.parse().ok()?),
    };
    Some(Record::new(start, 0, true, *title, normalize_app(app)).with_hwnd(hwnd))
}

/// Formats a record as a current-format line, without the newline.
pub fn to_log_line(record: &Record) -> String {
    if record.is_heading() {
        return HEADER_TEXT.to_string();
    }
    let active = if record.active { ACTIVE } else { INACTIVE };
    let hwnd = record
        .hwnd
        .map_or_else(|| NO_HWND.to_string(), |hwnd| format!("{hwnd:08X}"));
    format!(
        "{}\t{active}\t{hwnd}\t{}\t{}",
        record.start.format(DATETIME_FORMAT),
        record.title,
        record.app
    )
}
