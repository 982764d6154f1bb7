//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use actlog_core::AnalysisConfig;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::project::ProjectSpec;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the weekly log files.
    pub log_folder: PathBuf,

    /// User name that prefixes the log file names.
    pub user: String,

    /// Number of weeks listed by `actlog logs`.
    pub recent_weeks: usize,

    /// Classification rules, steps and grouping thresholds.
    pub analysis: AnalysisConfig,

    /// Projects shown on the time card.
    pub projects: Vec<ProjectSpec>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_folder", &self.log_folder)
            .field("user", &self.user)
            .field("recent_weeks", &self.recent_weeks)
            .field("rules", &self.analysis.rules.len())
            .field("steps", &self.analysis.steps.len())
            .field("grouping", &self.analysis.grouping)
            .field("projects", &self.projects.len())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            log_folder: data_dir.join("logs"),
            user: default_user(),
            recent_weeks: 3,
            analysis: AnalysisConfig::default(),
            projects: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// A file ending in `.json` is read as JSON, anything else as TOML.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = if path.extension().is_some_and(|ext| ext == "json") {
                figment.merge(Json::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        }

        // Load from environment variables (ACTLOG_*)
        figment = figment.merge(Env::prefixed("ACTLOG_"));

        figment.extract()
    }
}

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

/// Returns the platform-specific config directory for actlog.
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("actlog"))
}

/// Returns the platform-specific data directory for actlog.
///
/// On Linux: `~/.local/share/actlog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("actlog"))
}
