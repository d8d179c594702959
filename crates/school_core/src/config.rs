//! Runtime configuration for the school core.
//!
//! Every field has a default, so callers can deserialize partial input (for
//! example a JSON or TOML section) and leave the rest untouched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What list operations return when the table has no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyListPolicy {
    /// Signal `ServiceError::EmptyList`.
    #[default]
    Error,
    /// Return an empty list.
    EmptySuccess,
}

/// How `CourseRecord::number_of_students` is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentCountPolicy {
    /// Total number of students in the store, identical for every course.
    #[default]
    StoreWide,
    /// Size of the course's own roster.
    PerCourse,
}

/// Service-level behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub empty_list: EmptyListPolicy,
    pub enrollment_count: EnrollmentCountPolicy,
}

/// Logging backend settings consumed by `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: std::env::temp_dir().join("school_core"),
        }
    }
}
