//! Activity log CLI library.
//!
//! This crate provides the CLI interface for the activity log analyzer.

mod cli;
pub mod commands;
mod config;
pub mod project;

pub use cli::{Cli, Commands};
pub use config::Config;
