//! Planner configuration.
//!
//! Loaded from TOML. Every section and field is optional; missing values
//! fall back to the defaults below.
//!
//! ```toml
//! [search]
//! alpha = 0.6
//! delta = 0.2
//!
//! [schedule]
//! target_divisor = 3
//! depot = 0
//!
//! [files]
//! snapshot = "campus_backup.txt"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pathfinder::SearchWeights;
use crate::scheduler::ScheduleOptions;
use crate::traits::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub search: SearchWeights,
    pub schedule: ScheduleConfig,
    pub files: FileConfig,
}

/// Scheduling options plus the simulation settings used by the CLI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    #[serde(flatten)]
    pub options: ScheduleOptions,
    /// Start and return point of every daily route.
    pub depot: NodeId,
    /// Longest simulation accepted in one run.
    pub max_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            options: ScheduleOptions::default(),
            depot: 0,
            max_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Working snapshot, read at start and written after changes.
    pub snapshot: PathBuf,
    /// Canonical dataset copied over the snapshot on reset.
    pub canonical: PathBuf,
    /// First line holds the reset password.
    pub admin: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("campus_backup.txt"),
            canonical: PathBuf::from("campus_data.txt"),
            admin: PathBuf::from("admin.txt"),
        }
    }
}

impl PlannerConfig {
    /// Parses a TOML document and rejects search weights that would make
    /// edge costs negative.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.search.validate()?;
        Ok(config)
    }

    /// Reads a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.search.alpha, 0.6);
        assert_eq!(config.schedule.options.target_divisor, 3);
        assert_eq!(config.schedule.max_days, 30);
    }

    #[test]
    fn test_partial_sections_override() {
        let config = PlannerConfig::from_toml_str(
            r#"
            [search]
            delta = 0.5

            [schedule]
            target_divisor = 2
            depot = 4

            [files]
            snapshot = "data/working.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.delta, 0.5);
        assert_eq!(config.search.beta, 0.3);
        assert_eq!(config.schedule.options.target_divisor, 2);
        assert_eq!(config.schedule.options.min_targets, 1);
        assert_eq!(config.schedule.depot, 4);
        assert_eq!(config.files.snapshot, PathBuf::from("data/working.txt"));
        assert_eq!(config.files.admin, PathBuf::from("admin.txt"));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = PlannerConfig::from_toml_str("[search]\nalpha = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidWeight {
                field: "alpha",
                value
            } if value == -1.0
        ));
        assert!(PlannerConfig::from_toml_str("[search]\ndelta = -0.1\n").is_err());
    }

    #[test]
    fn test_rejects_wrong_types() {
        let err = PlannerConfig::from_toml_str("[search]\nalpha = \"high\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
