//! Two-sided Student <-> Course membership updates.
//!
//! Every change to enrollment goes through `enroll` or `withdraw`, which edit
//! both entities together. Persisting the pair is the caller's job and must
//! happen inside one transaction.

use crate::model::course::Course;
use crate::model::student::Student;
use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Relationship update rejected before touching either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipError {
    /// The entity has no store-assigned id yet.
    Unsaved(EntityKind),
}

impl Display for RelationshipError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsaved(kind) => write!(f, "{kind} must be saved before enrollment changes"),
        }
    }
}

impl Error for RelationshipError {}

/// Enrolls `student` in `course`, updating both sides.
///
/// Returns `Ok(false)` when the pair was already linked.
pub fn enroll(student: &mut Student, course: &mut Course) -> Result<bool, RelationshipError> {
    let student_id = student
        .id
        .ok_or(RelationshipError::Unsaved(EntityKind::Student))?;
    let course_id = course
        .id
        .ok_or(RelationshipError::Unsaved(EntityKind::Course))?;

    let added_to_student = student.course_ids.insert(course_id);
    let added_to_course = course.student_ids.insert(student_id);
    Ok(added_to_student || added_to_course)
}

/// Removes `student` from `course`, updating both sides.
///
/// Returns `Ok(false)` when neither side referenced the other.
pub fn withdraw(student: &mut Student, course: &mut Course) -> Result<bool, RelationshipError> {
    let student_id = student
        .id
        .ok_or(RelationshipError::Unsaved(EntityKind::Student))?;
    let course_id = course
        .id
        .ok_or(RelationshipError::Unsaved(EntityKind::Course))?;

    let removed_from_student = student.course_ids.remove(&course_id);
    let removed_from_course = course.student_ids.remove(&student_id);
    Ok(removed_from_student || removed_from_course)
}

/// Returns whether the pair agrees on membership from both sides.
pub fn is_symmetric(student: &Student, course: &Course) -> bool {
    match (student.id, course.id) {
        (Some(student_id), Some(course_id)) => {
            student.is_enrolled_in(course_id) == course.has_student(student_id)
        }
        _ => true,
    }
}
