//! Catalog configuration.
//!
//! # Responsibility
//! - Hold the field-constraint tables consumed by validators.
//! - Hold the grading policy applied by the catalog service.
//! - Load settings from JSON documents with per-field defaults.
//!
//! # Invariants
//! - Every section has a `Default` matching the academic calendar the
//!   catalog was built for (groups 111..=937, weeks 1..=14).
//! - `validate()` must pass before a config is used to build validators.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const STUDENTS_FILE: &str = "students.xml";
const ASSIGNMENTS_FILE: &str = "assignments.xml";
const GRADES_FILE: &str = "grades.xml";

/// Top-level catalog settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub students: StudentRules,
    pub assignments: AssignmentRules,
    pub grades: GradeRules,
    pub grading: GradingPolicy,
    pub logging: LoggingConfig,
}

/// Constraints on student records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRules {
    pub min_group: i32,
    pub max_group: i32,
}

impl Default for StudentRules {
    fn default() -> Self {
        Self {
            min_group: 111,
            max_group: 937,
        }
    }
}

/// Constraints on assignment records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentRules {
    pub first_week: i32,
    pub last_week: i32,
    /// Minimum number of weeks between start and deadline.
    pub min_gap_weeks: i32,
}

impl Default for AssignmentRules {
    fn default() -> Self {
        Self {
            first_week: 1,
            last_week: 14,
            min_gap_weeks: 0,
        }
    }
}

/// Constraints on stored grade records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeRules {
    pub min_value: f64,
    pub max_value: f64,
    pub first_week: i32,
    pub last_week: i32,
}

impl Default for GradeRules {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 10.0,
            first_week: 1,
            last_week: 14,
        }
    }
}

/// Late-submission policy used to derive stored grade values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingPolicy {
    /// Points removed per week past the deadline (added per week early).
    pub penalty_per_week: f64,
    /// Weeks past the deadline after which the floor value applies.
    pub max_late_weeks: i32,
    /// Stored value for submissions later than `max_late_weeks`.
    pub late_floor_value: f64,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            penalty_per_week: 2.5,
            max_late_weeks: 2,
            late_floor_value: 1.0,
        }
    }
}

/// File logging settings consumed by `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory; logging stays disabled when `None`.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Backing file locations for the three repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub students: PathBuf,
    pub assignments: PathBuf,
    pub grades: PathBuf,
}

impl CatalogPaths {
    /// Uses the conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            students: dir.join(STUDENTS_FILE),
            assignments: dir.join(ASSIGNMENTS_FILE),
            grades: dir.join(GRADES_FILE),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl CatalogConfig {
    /// Parses a JSON document; missing sections and fields keep defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Rejects inverted ranges and negative penalties.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.students.min_group > self.students.max_group {
            return Err(ConfigError::Invalid(format!(
                "students.min_group ({}) must be <= students.max_group ({})",
                self.students.min_group, self.students.max_group
            )));
        }
        if self.assignments.first_week > self.assignments.last_week {
            return Err(ConfigError::Invalid(format!(
                "assignments.first_week ({}) must be <= assignments.last_week ({})",
                self.assignments.first_week, self.assignments.last_week
            )));
        }
        if self.assignments.min_gap_weeks < 0 {
            return Err(ConfigError::Invalid(format!(
                "assignments.min_gap_weeks ({}) must not be negative",
                self.assignments.min_gap_weeks
            )));
        }
        if self.grades.min_value > self.grades.max_value {
            return Err(ConfigError::Invalid(format!(
                "grades.min_value ({}) must be <= grades.max_value ({})",
                self.grades.min_value, self.grades.max_value
            )));
        }
        if self.grades.first_week > self.grades.last_week {
            return Err(ConfigError::Invalid(format!(
                "grades.first_week ({}) must be <= grades.last_week ({})",
                self.grades.first_week, self.grades.last_week
            )));
        }
        if self.grading.penalty_per_week < 0.0 || self.grading.max_late_weeks < 0 {
            return Err(ConfigError::Invalid(
                "grading penalty and late window must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, CatalogPaths, ConfigError};
    use std::path::Path;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CatalogConfig::from_json_str("{}").expect("empty config should parse");
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.students.min_group, 111);
        assert_eq!(config.students.max_group, 937);
    }

    #[test]
    fn inverted_group_range_is_rejected() {
        let err = CatalogConfig::from_json_str(r#"{"students": {"min_group": 10, "max_group": 1}}"#)
            .expect_err("inverted range must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn paths_use_conventional_names() {
        let paths = CatalogPaths::in_dir("/data");
        assert_eq!(paths.students, Path::new("/data/students.xml"));
        assert_eq!(paths.grades, Path::new("/data/grades.xml"));
    }
}
