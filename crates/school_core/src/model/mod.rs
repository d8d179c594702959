//! Entity graph for school records.
//!
//! # Responsibility
//! - Define persisted entities and their relationship fields.
//! - Provide the two-sided enrollment helpers that keep Student <-> Course
//!   membership symmetric in memory.
//!
//! # Invariants
//! - Persisted entities carry a store-assigned numeric id; `None` means the
//!   entity has never been saved.
//! - `Student::course_ids` and `Course::student_ids` mirror each other.

pub mod address;
pub mod course;
pub mod enrollment;
pub mod student;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Persisted entity kinds, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Student,
    Course,
    Address,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Student => "Student",
            Self::Course => "Course",
            Self::Address => "Address",
        };
        f.write_str(label)
    }
}
