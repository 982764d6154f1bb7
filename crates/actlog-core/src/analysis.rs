//! End-to-end analysis of one day's records.
//!
//! # Pipeline
//!
//! 1. Classify every record with the ordered rule list
//! 2. Apply each step in turn; a step sees the tags written by earlier steps
//! 3. Group the resulting records into time entries

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, RuleSpec};
use crate::record::Record;
use crate::step::{Step, StepSpec};
use crate::time_entry::{GroupingConfig, TimeEntry, group_entries};
use crate::types::ValidationError;

/// Rules, steps and grouping thresholds as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub rules: Vec<RuleSpec>,
    pub steps: Vec<StepSpec>,
    pub grouping: GroupingConfig,
}

/// Result of running the pipeline.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutput {
    /// Records after classification and steps.
    pub records: Vec<Record>,
    pub entries: Vec<TimeEntry>,
}

impl AnalysisOutput {
    pub fn total_seconds(&self) -> i64 {
        self.entries.iter().map(|entry| entry.seconds).sum()
    }

    /// Total of entries whose action is not `remove`.
    pub fn paid_seconds(&self) -> i64 {
        self.entries
            .iter()
            .filter(|entry| entry.is_paid_hours())
            .map(|entry| entry.seconds)
            .sum()
    }
}

/// A compiled analysis pipeline.
#[derive(Debug, Clone)]
pub struct Analysis {
    classifier: Classifier,
    steps: Vec<Step>,
    grouping: GroupingConfig,
}

impl Analysis {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ValidationError> {
        config.grouping.validate()?;
        let steps = config
            .steps
            .iter()
            .map(Step::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classifier: Classifier::new(&config.rules),
            steps,
            grouping: config.grouping,
        })
    }

    pub fn run(&self, mut records: Vec<Record>) -> AnalysisOutput {
        self.classifier.apply_all(&mut records);

        let records = self
            .steps
            .iter()
            .fold(records, |records, step| step.apply(records));

        let entries = group_entries(&records, &self.grouping);
        tracing::debug!(
            records = records.len(),
            entries = entries.len(),
            "analysis complete"
        );

        AnalysisOutput { records, entries }
    }
}
