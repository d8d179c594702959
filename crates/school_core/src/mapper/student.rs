//! Student <-> record translation, including the composite
//! student-with-courses shape.

use crate::mapper::address::address_to_record;
use crate::mapper::course::{CourseLookup, CourseMapper};
use crate::mapper::record::{StudentRecord, StudentWithCoursesRecord};
use crate::model::address::Address;
use crate::model::course::Course;
use crate::model::student::Student;
use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use std::collections::BTreeSet;

/// A student with its relationships already loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStudent {
    pub student: Student,
    /// Courses in the order they should appear in the record.
    pub courses: Vec<Course>,
    pub address: Option<Address>,
}

pub fn student_to_record(student: &Student) -> StudentRecord {
    StudentRecord {
        id: student.id,
        name: student.name.clone(),
        gender: student.gender,
        birth_date: student.birth_date,
    }
}

/// Copies plain fields; address and courses are left for the caller.
pub fn record_to_student(record: &StudentRecord) -> Student {
    Student {
        id: record.id,
        name: record.name.clone(),
        gender: record.gender,
        birth_date: record.birth_date,
        address_id: None,
        course_ids: BTreeSet::new(),
    }
}

pub fn students_to_records(students: &[Student]) -> Vec<StudentRecord> {
    students.iter().map(student_to_record).collect()
}

/// Builds `StudentWithCoursesRecord`s, delegating courses to `CourseMapper`.
pub struct StudentWithCoursesMapper<'a, L: ?Sized> {
    courses: CourseMapper<'a, L>,
}

impl<'a, L: CourseLookup + ?Sized> StudentWithCoursesMapper<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            courses: CourseMapper::new(lookup),
        }
    }

    /// Maps one resolved student.
    ///
    /// # Errors
    /// - `InvalidData` when the student was never saved.
    pub fn to_record(&self, resolved: &ResolvedStudent) -> RepoResult<StudentWithCoursesRecord> {
        let student = &resolved.student;
        let id = student.id.ok_or_else(|| {
            RepoError::InvalidData(format!("{} `{}` has no id", EntityKind::Student, student.name))
        })?;

        Ok(StudentWithCoursesRecord {
            id,
            name: student.name.clone(),
            gender: student.gender,
            birth_date: student.birth_date,
            address: resolved.address.as_ref().map(address_to_record),
            courses: self.courses.to_records(&resolved.courses)?,
        })
    }

    pub fn to_records(
        &self,
        resolved: &[ResolvedStudent],
    ) -> RepoResult<Vec<StudentWithCoursesRecord>> {
        resolved.iter().map(|item| self.to_record(item)).collect()
    }
}
