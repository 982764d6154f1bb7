//! Core domain logic for the activity logger.
//!
//! This crate contains the segmentation and classification engine:
//! - Records: one observation of the active window, or a merged span of them
//! - Classification: naming records from an ordered list of title rules
//! - Steps: collapsing matched spans of records into single tagged records
//! - Time entries: grouping classified records into timesheet entries

pub mod analysis;
pub mod classify;
pub mod clock;
pub mod criteria;
pub mod record;
pub mod step;
pub mod time_entry;
mod types;

pub use analysis::{Analysis, AnalysisConfig, AnalysisOutput};
pub use classify::{Classification, Classifier, RuleSpec, UNKNOWN_TASK};
pub use criteria::{Criteria, CriteriaSpec};
pub use record::{Action, Record, normalize_app};
pub use step::{Activity, OnePerDay, Step, StepSpec};
pub use time_entry::{CollapsePolicy, GroupingConfig, TimeEntry, group_entries};
pub use types::ValidationError;
