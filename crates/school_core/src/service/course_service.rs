//! Course use-case service.
//!
//! # Responsibility
//! - Course CRUD, roster listing and instructor assignment.
//! - Serve as the `CourseLookup` behind every course record, so derived
//!   fields always come from this service's queries.
//!
//! # Invariants
//! - Deleting a course first withdraws every enrolled student from both
//!   sides, all in one transaction.

use crate::config::{EnrollmentCountPolicy, SchoolConfig};
use crate::mapper::{record_to_course, students_to_records, CourseLookup, CourseMapper};
use crate::mapper::{CourseRecord, StudentRecord};
use crate::model::course::{Course, CourseId, InstructorId};
use crate::model::enrollment::withdraw;
use crate::model::student::{Student, StudentId};
use crate::model::EntityKind;
use crate::repo::{RepoResult, SchoolRepository};
use crate::service::error::{non_empty, ServiceError, ServiceResult};
use log::info;

/// Course service facade.
pub struct CourseService<R: SchoolRepository> {
    repo: R,
    config: SchoolConfig,
}

impl<R: SchoolRepository> CourseService<R> {
    pub fn new(repo: R, config: SchoolConfig) -> Self {
        Self { repo, config }
    }

    /// Lists every course in id order.
    pub fn list_courses(&self) -> ServiceResult<Vec<CourseRecord>> {
        let courses = non_empty(
            self.config.empty_list,
            EntityKind::Course,
            self.repo.find_all_courses()?,
        )?;
        Ok(self.mapper().to_records(&courses)?)
    }

    pub fn get_course(&self, id: CourseId) -> ServiceResult<CourseRecord> {
        let course = self.find_course_by_id(id)?;
        Ok(self.mapper().to_record(&course)?)
    }

    /// Loads the course entity or signals `NotFound`.
    pub fn find_course_by_id(&self, id: CourseId) -> ServiceResult<Course> {
        self.repo
            .find_course_by_id(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Course,
                id,
            })
    }

    /// Creates a course with an empty roster; `record.id` is ignored.
    pub fn create_course(&self, record: &CourseRecord) -> ServiceResult<CourseRecord> {
        let mut course = record_to_course(record);
        course.id = None;

        let saved = self
            .repo
            .in_transaction(|| -> ServiceResult<Course> { Ok(self.repo.save_course(&course)?) })?;
        info!(
            "event=course_create module=service status=ok course_id={}",
            saved.id.unwrap_or_default()
        );
        Ok(self.mapper().to_record(&saved)?)
    }

    /// Overwrites name, code and credits; the roster is kept.
    pub fn update_course(&self, record: &CourseRecord, id: CourseId) -> ServiceResult<CourseRecord> {
        let saved = self.repo.in_transaction(|| -> ServiceResult<Course> {
            let mut course = self.find_course_by_id(id)?;
            course.name = record.name.clone();
            course.code = record.code.clone();
            course.credits = record.credits;
            Ok(self.repo.save_course(&course)?)
        })?;
        info!("event=course_update module=service status=ok course_id={id}");
        Ok(self.mapper().to_record(&saved)?)
    }

    /// Withdraws all students, then removes the course row.
    pub fn delete_course(&self, id: CourseId) -> ServiceResult<String> {
        let detached = self.repo.in_transaction(|| -> ServiceResult<usize> {
            let mut course = self.find_course_by_id(id)?;
            let roster: Vec<_> = course.student_ids.iter().copied().collect();
            for student_id in &roster {
                let mut student = self.enrolled_student(*student_id)?;
                withdraw(&mut student, &mut course)?;
                self.repo.save_student(&student)?;
            }
            self.repo.save_course(&course)?;
            self.repo.delete_course_by_id(id)?;
            Ok(roster.len())
        })?;
        info!("event=course_delete module=service status=ok course_id={id} detached={detached}");
        Ok(format!("Course with id = {id} Deleted...."))
    }

    /// Students enrolled in the course, in id order.
    pub fn students_of_course(&self, id: CourseId) -> ServiceResult<Vec<StudentRecord>> {
        let course = self.find_course_by_id(id)?;
        let students = course
            .student_ids
            .iter()
            .map(|student_id| self.enrolled_student(*student_id))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(students_to_records(&students))
    }

    /// Total number of students in the store.
    pub fn number_of_students(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_students()?)
    }

    pub fn instructor_of_course_id(&self, id: CourseId) -> ServiceResult<Option<InstructorId>> {
        Ok(self.repo.instructor_id_of_course(id)?)
    }

    /// Sets or clears the course's instructor.
    pub fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<InstructorId>,
    ) -> ServiceResult<CourseRecord> {
        let course = self.repo.in_transaction(|| -> ServiceResult<Course> {
            self.repo.assign_instructor(id, instructor_id)?;
            self.find_course_by_id(id)
        })?;
        info!(
            "event=course_assign_instructor module=service status=ok course_id={id} assigned={}",
            instructor_id.is_some()
        );
        Ok(self.mapper().to_record(&course)?)
    }

    fn enrolled_student(&self, student_id: StudentId) -> ServiceResult<Student> {
        self.repo
            .find_student_by_id(student_id)?
            .ok_or(ServiceError::InconsistentState(
                "course roster references a missing student",
            ))
    }

    fn mapper(&self) -> CourseMapper<'_, Self> {
        CourseMapper::new(self)
    }
}

impl<R: SchoolRepository> CourseLookup for CourseService<R> {
    fn enrolled_count(&self, course: &Course) -> RepoResult<u64> {
        match self.config.enrollment_count {
            EnrollmentCountPolicy::StoreWide => self.repo.count_students(),
            EnrollmentCountPolicy::PerCourse => Ok(course.enrolled_count() as u64),
        }
    }

    fn instructor_id(&self, course_id: CourseId) -> RepoResult<Option<InstructorId>> {
        self.repo.instructor_id_of_course(course_id)
    }
}
