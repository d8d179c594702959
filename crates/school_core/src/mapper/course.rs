//! Course <-> record translation with derived fields.
//!
//! # Invariants
//! - `number_of_students` and `instructor_id` are always computed through the
//!   lookup at mapping time, never read from the input record.

use crate::mapper::record::CourseRecord;
use crate::model::course::{Course, CourseId, InstructorId};
use crate::repo::RepoResult;
use std::collections::BTreeSet;

/// Query operations the course mapping calls out to.
pub trait CourseLookup {
    /// Value reported as `numberOfStudents` for `course`.
    fn enrolled_count(&self, course: &Course) -> RepoResult<u64>;
    /// Instructor currently assigned to the course.
    fn instructor_id(&self, course_id: CourseId) -> RepoResult<Option<InstructorId>>;
}

/// Maps courses to records using an injected lookup.
pub struct CourseMapper<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: CourseLookup + ?Sized> CourseMapper<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Copies course fields and computes the derived ones.
    ///
    /// Unsaved courses have no instructor.
    pub fn to_record(&self, course: &Course) -> RepoResult<CourseRecord> {
        let instructor_id = match course.id {
            Some(course_id) => self.lookup.instructor_id(course_id)?,
            None => None,
        };

        Ok(CourseRecord {
            id: course.id,
            name: course.name.clone(),
            code: course.code.clone(),
            credits: course.credits,
            number_of_students: self.lookup.enrolled_count(course)?,
            instructor_id,
        })
    }

    pub fn to_records(&self, courses: &[Course]) -> RepoResult<Vec<CourseRecord>> {
        courses.iter().map(|course| self.to_record(course)).collect()
    }
}

/// Copies plain course fields; the roster starts empty.
pub fn record_to_course(record: &CourseRecord) -> Course {
    Course {
        id: record.id,
        name: record.name.clone(),
        code: record.code.clone(),
        credits: record.credits,
        student_ids: BTreeSet::new(),
    }
}

pub fn records_to_courses(records: &[CourseRecord]) -> Vec<Course> {
    records.iter().map(record_to_course).collect()
}
