//! Record-matching criteria shared by the `first` and `last` sides of a step.
//!
//! Criteria are configured as [`CriteriaSpec`] and compiled once into
//! [`Criteria`], a list of tagged predicates plus the span conditions that
//! only make sense while scanning for the end of a span.
//!
//! Compilation never fails: a pattern that does not compile is reported
//! and rejects every record, and a malformed `HH:MM` bound degrades to the
//! permissive default.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::clock::{DurationWindow, TimeOfDayWindow, parse_duration, parse_time_of_day};
use crate::record::Record;

/// Criteria as written in configuration. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Case-insensitive regex searched in the application name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    /// Case-insensitive regex, or list of alternatives, searched in the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,

    /// Whether (or with what) the record must already be tagged by a step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<TaggedSpec>,

    /// Time-of-day window for the record that opens a span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<WindowSpec>,

    /// Span duration window, measured from the span's first start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<WindowSpec>,

    /// Require every record in the span to satisfy the `first` criteria.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous: Option<ContinuousSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermittent: Option<Intermittent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleSpec {
    One(String),
    Any(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaggedSpec {
    Flag(bool),
    Name(String),
}

/// `{min, max}` pair of `HH:MM` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContinuousSpec {
    Flag(bool),
    Only(Vec<PredicateKind>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intermittent {
    /// The span's last record must carry exactly the first record's title.
    ExactTitle,
}

/// Names of the per-record predicates, used to filter `continuous` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    Active,
    App,
    Title,
    Tagged,
}

/// A case-insensitive search pattern. Invalid patterns never match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        let regex = match RegexBuilder::new(source).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!(pattern = source, %err, "invalid pattern, it will never match");
                None
            }
        };
        Self {
            source: source.to_string(),
            regex,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRequirement {
    Untagged,
    Tagged,
    Named(String),
}

impl TagRequirement {
    fn accepts(&self, activity: &str) -> bool {
        match self {
            Self::Untagged => activity.is_empty(),
            Self::Tagged => !activity.is_empty(),
            Self::Named(name) => activity == name,
        }
    }
}

/// A single test over one record.
#[derive(Debug, Clone)]
pub enum Predicate {
    Active(bool),
    App(Pattern),
    /// Matches when any alternative matches.
    Title(Vec<Pattern>),
    Tagged(TagRequirement),
}

impl Predicate {
    pub const fn kind(&self) -> PredicateKind {
        match self {
            Self::Active(_) => PredicateKind::Active,
            Self::App(_) => PredicateKind::App,
            Self::Title(_) => PredicateKind::Title,
            Self::Tagged(_) => PredicateKind::Tagged,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Active(active) => record.active == *active,
            Self::App(pattern) => pattern.is_match(&record.app),
            Self::Title(patterns) => patterns.iter().any(|p| p.is_match(&record.title)),
            Self::Tagged(requirement) => requirement.accepts(&record.activity),
        }
    }
}

/// Which of the `first` predicates every record inside a span must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Continuity {
    #[default]
    Off,
    All,
    Only(Vec<PredicateKind>),
}

/// Compiled criteria.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    predicates: Vec<Predicate>,
    pub started_at: Option<TimeOfDayWindow>,
    pub duration: Option<DurationWindow>,
    pub continuity: Continuity,
    pub intermittent: Option<Intermittent>,
}

impl Criteria {
    pub fn compile(spec: &CriteriaSpec) -> Self {
        let mut predicates = Vec::new();

        if let Some(active) = spec.active {
            predicates.push(Predicate::Active(active));
        }
        if let Some(app) = &spec.app {
            predicates.push(Predicate::App(Pattern::new(app)));
        }
        if let Some(title) = &spec.title {
            let patterns = match title {
                TitleSpec::One(pattern) => vec![Pattern::new(pattern)],
                TitleSpec::Any(patterns) => patterns.iter().map(|p| Pattern::new(p)).collect(),
            };
            predicates.push(Predicate::Title(patterns));
        }
        if let Some(tagged) = &spec.tagged {
            let requirement = match tagged {
                TaggedSpec::Flag(false) => TagRequirement::Untagged,
                TaggedSpec::Flag(true) => TagRequirement::Tagged,
                TaggedSpec::Name(name) => TagRequirement::Named(name.clone()),
            };
            predicates.push(Predicate::Tagged(requirement));
        }

        let started_at = spec.started_at.as_ref().map(|window| TimeOfDayWindow {
            min: window.min.as_deref().and_then(parse_time_of_day),
            max: window.max.as_deref().and_then(parse_time_of_day),
        });
        let duration = spec.duration.as_ref().map(|window| DurationWindow {
            min: window.min.as_deref().map(parse_duration),
            max: window.max.as_deref().map(parse_duration),
        });
        let continuity = match &spec.continuous {
            None | Some(ContinuousSpec::Flag(false)) => Continuity::Off,
            Some(ContinuousSpec::Flag(true)) => Continuity::All,
            Some(ContinuousSpec::Only(kinds)) => Continuity::Only(kinds.clone()),
        };

        Self {
            predicates,
            started_at,
            duration,
            continuity,
            intermittent: spec.intermittent,
        }
    }

    /// Checks every per-record predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Checks only the predicates whose kind is listed.
    pub fn matches_only(&self, record: &Record, kinds: &[PredicateKind]) -> bool {
        self.predicates
            .iter()
            .filter(|p| kinds.contains(&p.kind()))
            .all(|p| p.matches(record))
    }

    /// Checks whether a record can open a span: predicates plus the `started_at` window.
    pub fn opens_span(&self, record: &Record) -> bool {
        self.matches(record)
            && self
                .started_at
                .is_none_or(|window| window.contains(record.time_of_day()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(title: &str, app: &str) -> Record {
        Record::new(at(9, 0), 60, true, title, app)
    }

    fn compile(json: &str) -> Criteria {
        let spec: CriteriaSpec = serde_json::from_str(json).unwrap();
        Criteria::compile(&spec)
    }

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = compile("{}");
        assert!(criteria.matches(&record("anything", "any.exe")));
        assert!(criteria.opens_span(&record("", "")));
    }

    #[test]
    fn active_is_exact() {
        let criteria = compile(r#"{"active": false}"#);
        let mut rec = record("Lock", "");
        assert!(!criteria.matches(&rec));
        rec.active = false;
        assert!(criteria.matches(&rec));
    }

    #[test]
    fn app_and_title_search_case_insensitively() {
        let criteria = compile(r#"{"app": "^outlook", "title": "inbox"}"#);
        assert!(criteria.matches(&record("Inbox - jane@example.com", "OUTLOOK.EXE")));
        assert!(!criteria.matches(&record("Calendar", "outlook.exe")));
        assert!(!criteria.matches(&record("Inbox", "thunderbird")));
    }

    #[test]
    fn title_alternatives_are_ored() {
        let criteria = compile(r#"{"title": ["standup", "retro"]}"#);
        assert!(criteria.matches(&record("Sprint Retro", "")));
        assert!(criteria.matches(&record("Daily standup", "")));
        assert!(!criteria.matches(&record("Planning", "")));
    }

    #[test]
    fn empty_title_list_rejects() {
        let criteria = compile(r#"{"title": []}"#);
        assert!(!criteria.matches(&record("Planning", "")));
    }

    #[test]
    fn invalid_pattern_rejects_instead_of_failing() {
        let criteria = compile(r#"{"title": "(unclosed"}"#);
        assert!(!criteria.matches(&record("(unclosed", "")));
    }

    #[test]
    fn tagged_flag_and_name() {
        let mut rec = record("Teams", "teams.exe");

        let untagged = compile(r#"{"tagged": false}"#);
        let tagged = compile(r#"{"tagged": true}"#);
        let lunch = compile(r#"{"tagged": "Lunch"}"#);

        assert!(untagged.matches(&rec));
        assert!(!tagged.matches(&rec));

        rec.activity = "Lunch".to_string();
        assert!(!untagged.matches(&rec));
        assert!(tagged.matches(&rec));
        assert!(lunch.matches(&rec));

        rec.activity = "Break".to_string();
        assert!(!lunch.matches(&rec));
    }

    #[test]
    fn unset_tagged_is_not_checked() {
        let criteria = compile(r#"{"active": true}"#);
        let mut rec = record("Teams", "teams.exe");
        rec.activity = "Meeting".to_string();
        assert!(criteria.matches(&rec));
    }

    #[test]
    fn matches_only_filters_predicates() {
        let criteria = compile(r#"{"active": true, "title": "build"}"#);
        let rec = record("Editor", "code.exe");
        assert!(!criteria.matches(&rec));
        assert!(criteria.matches_only(&rec, &[PredicateKind::Active]));
        assert!(!criteria.matches_only(&rec, &[PredicateKind::Title]));
    }

    #[test]
    fn started_at_gates_span_opening_only() {
        let criteria = compile(r#"{"started_at": {"min": "11:00", "max": "13:30"}}"#);
        let mut rec = record("", "");
        rec.start = at(10, 59);
        assert!(criteria.matches(&rec));
        assert!(!criteria.opens_span(&rec));

        rec.start = at(11, 0);
        assert!(criteria.opens_span(&rec));
        rec.start = at(13, 30);
        assert!(criteria.opens_span(&rec));
        rec.start = at(13, 31);
        assert!(!criteria.opens_span(&rec));
    }

    #[test]
    fn span_conditions_compile() {
        let criteria = compile(
            r#"{"duration": {"min": "00:10", "max": "02:00"},
                "continuous": ["active"],
                "intermittent": "exact_title"}"#,
        );
        assert_eq!(
            criteria.duration,
            Some(DurationWindow {
                min: Some(Duration::minutes(10)),
                max: Some(Duration::hours(2)),
            })
        );
        assert_eq!(
            criteria.continuity,
            Continuity::Only(vec![PredicateKind::Active])
        );
        assert_eq!(criteria.intermittent, Some(Intermittent::ExactTitle));
    }

    #[test]
    fn malformed_duration_is_zero() {
        let criteria = compile(r#"{"duration": {"max": "2h"}}"#);
        assert_eq!(
            criteria.duration.unwrap().max,
            Some(Duration::zero())
        );
    }

    #[test]
    fn continuous_false_is_off() {
        assert_eq!(compile(r#"{"continuous": false}"#).continuity, Continuity::Off);
        assert_eq!(compile(r#"{"continuous": true}"#).continuity, Continuity::All);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<CriteriaSpec, _> = serde_json::from_str(r#"{"once_per_day": true}"#);
        assert!(result.is_err());
    }
}
