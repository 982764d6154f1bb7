//! `HH:MM` durations and times of day as written in rule configuration.

use std::sync::LazyLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d\d):(\d\d)$").unwrap());

/// Parses an `HH:MM` duration.
///
/// Malformed text is reported and treated as a zero duration so the rule
/// that carries it keeps working with a permissive window.
pub fn parse_duration(text: &str) -> Duration {
    let Some(caps) = DURATION_RE.captures(text) else {
        tracing::warn!(text, "invalid duration format, using 00:00");
        return Duration::zero();
    };
    // Both groups are exactly two ASCII digits.
    let hours: i64 = caps[1].parse().unwrap_or_default();
    let minutes: i64 = caps[2].parse().unwrap_or_default();
    Duration::seconds(hours * 3600 + minutes * 60)
}

/// Parses an `HH:MM` time of day.
///
/// Malformed text is reported and yields `None`, leaving the bound open.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    match NaiveTime::parse_from_str(text, "%H:%M") {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::warn!(text, %err, "invalid time of day, ignoring bound");
            None
        }
    }
}

/// Converts an `HHMM` integer (e.g. `930` for 09:30) to seconds since midnight.
pub fn hhmm_to_seconds(hhmm: u32) -> i64 {
    i64::from(hhmm / 100) * 3600 + i64::from(hhmm % 100) * 60
}

/// Inclusive `min`/`max` window over a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationWindow {
    pub min: Option<Duration>,
    pub max: Option<Duration>,
}

impl DurationWindow {
    pub fn is_too_short(&self, duration: Duration) -> bool {
        self.min.is_some_and(|min| duration < min)
    }

    pub fn is_too_long(&self, duration: Duration) -> bool {
        self.max.is_some_and(|max| duration > max)
    }
}

/// Inclusive `min`/`max` window over a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDayWindow {
    pub min: Option<NaiveTime>,
    pub max: Option<NaiveTime>,
}

impl TimeOfDayWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.min.is_none_or(|min| min <= time) && self.max.is_none_or(|max| time <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_reads_hours_and_minutes() {
        assert_eq!(parse_duration("01:30"), Duration::minutes(90));
        assert_eq!(parse_duration("00:00"), Duration::zero());
        assert_eq!(parse_duration("10:05"), Duration::minutes(605));
    }

    #[test]
    fn parse_duration_rejects_loose_formats() {
        assert_eq!(parse_duration("1:30"), Duration::zero());
        assert_eq!(parse_duration("01:30:00"), Duration::zero());
        assert_eq!(parse_duration("an hour"), Duration::zero());
    }

    #[test]
    fn parse_time_of_day_accepts_hh_mm() {
        assert_eq!(
            parse_time_of_day("11:30"),
            NaiveTime::from_hms_opt(11, 30, 0)
        );
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn hhmm_converts_to_seconds() {
        assert_eq!(hhmm_to_seconds(0), 0);
        assert_eq!(hhmm_to_seconds(930), 9 * 3600 + 30 * 60);
        assert_eq!(hhmm_to_seconds(1700), 17 * 3600);
    }

    #[test]
    fn duration_window_bounds_are_inclusive() {
        let window = DurationWindow {
            min: Some(Duration::minutes(5)),
            max: Some(Duration::minutes(10)),
        };
        assert!(window.is_too_short(Duration::seconds(299)));
        assert!(!window.is_too_short(Duration::minutes(5)));
        assert!(!window.is_too_long(Duration::minutes(10)));
        assert!(window.is_too_long(Duration::seconds(601)));
    }

    #[test]
    fn time_of_day_window_open_bounds() {
        let window = TimeOfDayWindow {
            min: NaiveTime::from_hms_opt(11, 0, 0),
            max: None,
        };
        assert!(!window.contains(NaiveTime::from_hms_opt(10, 59, 59).unwrap()));
        assert!(window.contains(NaiveTime::from_hms_opt(11, 0, 0).unwrap()));
        assert!(window.contains(NaiveTime::from_hms_opt(23, 59, 59).unwrap()));
    }
}
