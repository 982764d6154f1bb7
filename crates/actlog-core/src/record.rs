//! Activity records.
//!
//! A [`Record`] starts life as one line of the activity log and may later
//! absorb its neighbours when a step collapses a span into it.

use std::fmt;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Title carried by session heading rows in legacy logs.
pub const HEADING_TITLE: &str = "Title";

/// Title prefix carried by idle rows in legacy logs.
pub const IDLE_TITLE: &str = "IDLE";

/// How a classified record merges with its neighbours into time entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Extend only through records with the same name.
    Sequential,
    /// Absorb brief interruptions up to the collapse cap.
    Collapse,
    /// Not paid hours; still counted in the raw total.
    Remove,
    /// Not classified yet. Groups like [`Action::Sequential`].
    #[default]
    Default,
}

impl Action {
    /// String representation used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Collapse => "collapse",
            Self::Remove => "remove",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation of the user's active window, or a merged span of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Local time the observation started.
    pub start: NaiveDateTime,
    /// Duration in seconds; `stop = start + seconds`.
    pub seconds: i64,
    /// Whether the user was interacting with the machine.
    pub active: bool,
    /// Platform window handle, `None` when the handle was invalid.
    pub hwnd: Option<u64>,
    /// Window title.
    pub title: String,
    /// Lower-cased file name of the owning application.
    pub app: String,
    /// Tag applied by a step; empty until a step collapses this record.
    pub activity: String,
    /// Name applied by the classifier; empty until classified.
    pub textout: String,
    /// Merge policy applied by the classifier.
    pub action: Action,
    /// Session heading marker; carries no time of its own.
    pub heading: bool,
}

impl Record {
    /// Creates an unclassified record.
    pub fn new(
        start: NaiveDateTime,
        seconds: i64,
        active: bool,
        title: impl Into<String>,
        app: impl Into<String>,
    ) -> Self {
        Self {
            start,
            seconds,
            active,
            hwnd: None,
            title: title.into(),
            app: app.into(),
            activity: String::new(),
            textout: String::new(),
            action: Action::Default,
            heading: false,
        }
    }

    /// Creates a session heading marker at the given time.
    pub fn heading(start: NaiveDateTime) -> Self {
        Self {
            heading: true,
            ..Self::new(start, 0, false, HEADING_TITLE, "")
        }
    }

    /// Sets the window handle.
    #[must_use]
    pub const fn with_hwnd(mut self, hwnd: Option<u64>) -> Self {
        self.hwnd = hwnd;
        self
    }

    /// Time the record ends.
    pub fn stop(&self) -> NaiveDateTime {
        self.start + Duration::seconds(self.seconds)
    }

    /// Moves the end of the record, keeping its start.
    pub fn set_stop(&mut self, stop: NaiveDateTime) {
        self.seconds = (stop - self.start).num_seconds();
    }

    /// Calendar day the record started.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Time of day the record started.
    pub fn time_of_day(&self) -> NaiveTime {
        self.start.time()
    }

    /// Day of the week the record started, Monday = 0.
    pub fn weekday(&self) -> u32 {
        self.start.weekday().num_days_from_monday()
    }

    pub const fn hwnd_is_valid(&self) -> bool {
        self.hwnd.is_some()
    }

    /// Returns true for session heading rows.
    pub const fn is_heading(&self) -> bool {
        self.heading
    }

    /// Returns true for legacy idle rows.
    pub fn is_idle(&self) -> bool {
        self.title.starts_with(IDLE_TITLE)
    }

    /// Name used when grouping into time entries.
    ///
    /// A step tag wins over the classifier's name.
    pub fn name(&self) -> &str {
        if self.activity.is_empty() {
            &self.textout
        } else {
            &self.activity
        }
    }
}

/// Reduces an application path to its lower-cased file name.
pub fn normalize_app(path: &str) -> String {
    // Logs written on Windows carry backslash separators.
    let path = path.replace('\\', "/");
    Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_lowercase()
}
