//! CLI subcommand implementations.

pub mod analyze;
pub mod convert;
pub mod logs;
pub mod report;
pub mod util;
