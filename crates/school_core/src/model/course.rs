//! Course entity.
//!
//! # Invariants
//! - `student_ids` is the course side of the enrollment relation and must be
//!   changed through `model::enrollment` so the student side follows.
//! - The instructor assignment is not part of the entity; it is resolved by
//!   lookup when a course is mapped for callers.

use crate::model::student::StudentId;
use std::collections::BTreeSet;

/// Store-assigned course identifier.
pub type CourseId = i64;

/// External instructor identifier attached to a course row.
pub type InstructorId = i64;

/// Course with its enrolled roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: Option<CourseId>,
    pub name: String,
    pub code: String,
    pub credits: u32,
    /// Ids of enrolled students.
    pub student_ids: BTreeSet<StudentId>,
}

impl Course {
    /// Creates an unsaved course with an empty roster.
    pub fn new(name: impl Into<String>, code: impl Into<String>, credits: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            code: code.into(),
            credits,
            student_ids: BTreeSet::new(),
        }
    }

    /// Number of students on this course's roster.
    pub fn enrolled_count(&self) -> usize {
        self.student_ids.len()
    }

    pub fn has_student(&self, student_id: StudentId) -> bool {
        self.student_ids.contains(&student_id)
    }
}
