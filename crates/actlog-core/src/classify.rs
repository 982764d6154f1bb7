//! Record classification.
//!
//! Rules are evaluated in the order they were written and the first match
//! wins, so the list doubles as a priority chain. A record that no rule
//! claims is named [`UNKNOWN_TASK`].

use chrono::Timelike;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::clock::hhmm_to_seconds;
use crate::record::{Action, Record};

/// Name given to records that no rule matches.
pub const UNKNOWN_TASK: &str = "Unknown Task";

/// Placeholder in a rule name that is replaced by the first capture group.
const CAPTURE_PLACEHOLDER: &str = "$1";

/// A classification rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Display name; may contain `$1`.
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_rule_action")]
    pub action: Action,

    /// Case-insensitive regex searched in the window title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Minimum record duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_min: Option<i64>,

    /// Earliest start time, as `HHMM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<u32>,

    /// Latest stop time, as `HHMM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<u32>,
}

const fn default_rule_action() -> Action {
    Action::Sequential
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            action: default_rule_action(),
            regex: None,
            seconds_min: None,
            after: None,
            before: None,
        }
    }
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub name: String,
    pub action: Action,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            name: UNKNOWN_TASK.to_string(),
            action: Action::Sequential,
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    name: String,
    action: Action,
    /// `None` when the pattern was missing or invalid; such a rule never matches.
    regex: Option<Regex>,
    seconds_min: Option<i64>,
    after_seconds: Option<i64>,
    before_seconds: Option<i64>,
}

impl Rule {
    fn compile(spec: &RuleSpec) -> Self {
        let regex = match spec.regex.as_deref() {
            Some(pattern) if !spec.name.is_empty() => {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        tracing::warn!(rule = %spec.name, %err, "invalid rule regex, rule disabled");
                        None
                    }
                }
            }
            _ => {
                tracing::warn!(rule = %spec.name, "rule needs a name and a regex, rule disabled");
                None
            }
        };

        Self {
            name: spec.name.clone(),
            action: spec.action,
            regex,
            seconds_min: spec.seconds_min,
            after_seconds: spec.after.map(hhmm_to_seconds),
            before_seconds: spec.before.map(hhmm_to_seconds),
        }
    }

    fn classify(&self, record: &Record) -> Option<Classification> {
        let regex = self.regex.as_ref()?;

        if self.seconds_min.is_some_and(|min| record.seconds < min) {
            return None;
        }

        let start = i64::from(record.time_of_day().num_seconds_from_midnight());
        if self.after_seconds.is_some_and(|after| start < after) {
            return None;
        }
        if self
            .before_seconds
            .is_some_and(|before| start + record.seconds > before)
        {
            return None;
        }

        let caps = regex.captures(&record.title)?;
        let name = match caps.get(1) {
            Some(group) if self.name.contains(CAPTURE_PLACEHOLDER) => {
                self.name.replace(CAPTURE_PLACEHOLDER, group.as_str())
            }
            _ => self.name.clone(),
        };

        Some(Classification {
            name,
            action: self.action,
        })
    }
}

/// Ordered, first-match-wins classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(specs: &[RuleSpec]) -> Self {
        Self {
            rules: specs.iter().map(Rule::compile).collect(),
        }
    }

    pub fn classify(&self, record: &Record) -> Classification {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(record))
            .unwrap_or_else(Classification::unknown)
    }

    /// Writes the classification into the record's `textout` and `action`.
    pub fn apply(&self, record: &mut Record) {
        let Classification { name, action } = self.classify(record);
        record.textout = name;
        record.action = action;
    }

    pub fn apply_all(&self, records: &mut [Record]) {
        for record in records.iter_mut().filter(|r| !r.is_heading()) {
            self.apply(record);
        }
    }
}
