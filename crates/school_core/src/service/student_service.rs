//! Student use-case service.
//!
//! # Responsibility
//! - Student CRUD with the age rule on create and update.
//! - Keep Student <-> Course membership symmetric on enroll, withdraw and
//!   delete.
//! - Resolve relationships before handing students to the mapping layer.
//!
//! # Invariants
//! - `delete_student` checks existence, detaches the student from every
//!   course and deletes the row in one transaction; the address survives.
//! - Name lookups never signal `EmptyList`.

use crate::config::SchoolConfig;
use crate::mapper::{
    address_to_record, record_to_student, CourseMapper, ResolvedStudent, StudentWithCoursesMapper,
};
use crate::mapper::{AddressRecord, CourseRecord, StudentRecord, StudentWithCoursesRecord};
use crate::model::address::{Address, AddressId};
use crate::model::course::{Course, CourseId};
use crate::model::enrollment::{enroll, is_symmetric, withdraw};
use crate::model::student::{Student, StudentId};
use crate::model::EntityKind;
use crate::repo::{GenderCount, SchoolRepository};
use crate::service::course_service::CourseService;
use crate::service::error::{non_empty, ServiceError, ServiceResult};
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// Student service facade.
///
/// Owns a `CourseService` over the same repository; it is the lookup used
/// when student records embed their courses.
pub struct StudentService<R: SchoolRepository + Clone> {
    repo: R,
    courses: CourseService<R>,
    config: SchoolConfig,
}

impl<R: SchoolRepository + Clone> StudentService<R> {
    pub fn new(repo: R, config: SchoolConfig) -> Self {
        Self {
            courses: CourseService::new(repo.clone(), config),
            repo,
            config,
        }
    }

    /// Lists every student with address and courses, in id order.
    pub fn list_students(&self) -> ServiceResult<Vec<StudentWithCoursesRecord>> {
        let students = non_empty(
            self.config.empty_list,
            EntityKind::Student,
            self.repo.find_all_students()?,
        )?;
        self.map_students(students)
    }

    pub fn get_student(&self, id: StudentId) -> ServiceResult<StudentWithCoursesRecord> {
        let student = self.find_student_by_id(id)?;
        self.map_student(student)
    }

    /// Loads the student entity or signals `NotFound`.
    pub fn find_student_by_id(&self, id: StudentId) -> ServiceResult<Student> {
        self.repo
            .find_student_by_id(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Student,
                id,
            })
    }

    /// Creates a student after checking the age rule; `record.id` is ignored.
    pub fn create_student(&self, record: &StudentRecord) -> ServiceResult<StudentWithCoursesRecord> {
        let mut student = record_to_student(record);
        student.id = None;
        self.check_age(&student, "student_create")?;

        let saved = self
            .repo
            .in_transaction(|| -> ServiceResult<Student> { Ok(self.repo.save_student(&student)?) })?;
        info!(
            "event=student_create module=service status=ok student_id={}",
            saved.id.unwrap_or_default()
        );
        self.map_student(saved)
    }

    /// Overwrites name, gender and birth date, then re-checks the age rule.
    ///
    /// Address and course memberships are kept.
    pub fn update_student(
        &self,
        record: &StudentRecord,
        id: StudentId,
    ) -> ServiceResult<StudentWithCoursesRecord> {
        let saved = self.repo.in_transaction(|| -> ServiceResult<Student> {
            let mut student = self.find_student_by_id(id)?;
            student.name = record.name.clone();
            student.gender = record.gender;
            student.birth_date = record.birth_date;
            self.check_age(&student, "student_update")?;
            Ok(self.repo.save_student(&student)?)
        })?;
        info!("event=student_update module=service status=ok student_id={id}");
        self.map_student(saved)
    }

    /// Detaches the student from all courses and deletes it.
    pub fn delete_student(&self, id: StudentId) -> ServiceResult<String> {
        let detached = self.repo.in_transaction(|| -> ServiceResult<usize> {
            let detached = self.detach_in_current_transaction(id)?;
            self.repo.delete_student_by_id(id)?;
            Ok(detached)
        })?;
        info!("event=student_delete module=service status=ok student_id={id} detached={detached}");
        Ok(format!("Student with id = {id} Deleted...."))
    }

    /// Removes the student from every course roster, keeping the student.
    ///
    /// Returns the number of courses the student was removed from.
    pub fn detach_from_all_courses(&self, id: StudentId) -> ServiceResult<usize> {
        self.repo
            .in_transaction(|| self.detach_in_current_transaction(id))
    }

    /// Exact name match; an empty result is not an error.
    pub fn find_students_by_name(&self, name: &str) -> ServiceResult<Vec<StudentWithCoursesRecord>> {
        let students = self.repo.find_students_by_name(name)?;
        self.map_students(students)
    }

    pub fn gender_groups(&self) -> ServiceResult<Vec<GenderCount>> {
        Ok(self.repo.group_by_gender()?)
    }

    pub fn courses_of_student(&self, id: StudentId) -> ServiceResult<Vec<CourseRecord>> {
        let student = self.find_student_by_id(id)?;
        let courses = self.load_courses(&student)?;
        Ok(CourseMapper::new(&self.courses).to_records(&courses)?)
    }

    pub fn course_names_of_student(&self, id: StudentId) -> ServiceResult<Vec<String>> {
        let student = self.find_student_by_id(id)?;
        Ok(self
            .load_courses(&student)?
            .into_iter()
            .map(|course| course.name)
            .collect())
    }

    pub fn address_of_student(&self, id: StudentId) -> ServiceResult<AddressRecord> {
        Ok(address_to_record(&self.assigned_address(id)?))
    }

    pub fn address_city_of_student(&self, id: StudentId) -> ServiceResult<String> {
        Ok(self.assigned_address(id)?.city)
    }

    pub fn find_address_by_id(&self, id: AddressId) -> ServiceResult<Address> {
        self.repo
            .find_address_by_id(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Address,
                id,
            })
    }

    /// Links student and course on both sides.
    pub fn enroll_in_course(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> ServiceResult<StudentWithCoursesRecord> {
        let student = self.update_membership(student_id, course_id, |student, course| {
            Ok(enroll(student, course)?)
        })?;
        info!("event=student_enroll module=service status=ok student_id={student_id} course_id={course_id}");
        self.map_student(student)
    }

    /// Unlinks student and course on both sides.
    pub fn withdraw_from_course(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> ServiceResult<StudentWithCoursesRecord> {
        let student = self.update_membership(student_id, course_id, |student, course| {
            Ok(withdraw(student, course)?)
        })?;
        info!("event=student_withdraw module=service status=ok student_id={student_id} course_id={course_id}");
        self.map_student(student)
    }

    /// Sets or clears the student's address reference.
    pub fn assign_address(
        &self,
        student_id: StudentId,
        address_id: Option<AddressId>,
    ) -> ServiceResult<StudentWithCoursesRecord> {
        let saved = self.repo.in_transaction(|| -> ServiceResult<Student> {
            let mut student = self.find_student_by_id(student_id)?;
            if let Some(address_id) = address_id {
                self.find_address_by_id(address_id)?;
            }
            student.address_id = address_id;
            Ok(self.repo.save_student(&student)?)
        })?;
        info!(
            "event=student_assign_address module=service status=ok student_id={student_id} assigned={}",
            address_id.is_some()
        );
        self.map_student(saved)
    }

    pub fn number_of_students(&self) -> ServiceResult<u64> {
        self.courses.number_of_students()
    }

    /// Must run inside a transaction opened by the caller.
    fn detach_in_current_transaction(&self, id: StudentId) -> ServiceResult<usize> {
        let mut student = self.find_student_by_id(id)?;
        let course_ids: Vec<CourseId> = student.course_ids.iter().copied().collect();
        for course_id in &course_ids {
            let mut course = self.enrolled_course(*course_id)?;
            withdraw(&mut student, &mut course)?;
            self.repo.save_course(&course)?;
        }
        self.repo.save_student(&student)?;
        Ok(course_ids.len())
    }

    fn update_membership<F>(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        change: F,
    ) -> ServiceResult<Student>
    where
        F: FnOnce(&mut Student, &mut Course) -> ServiceResult<bool>,
    {
        self.repo.in_transaction(|| -> ServiceResult<Student> {
            let mut student = self.find_student_by_id(student_id)?;
            let mut course = self.courses.find_course_by_id(course_id)?;
            if !change(&mut student, &mut course)? {
                return Ok(student);
            }
            debug_assert!(is_symmetric(&student, &course));
            self.repo.save_course(&course)?;
            Ok(self.repo.save_student(&student)?)
        })
    }

    fn check_age(&self, student: &Student, event: &str) -> ServiceResult<i32> {
        student.validate_age(today()).map_err(|err| {
            warn!("event={event} module=service status=rejected error_code=invalid_age");
            ServiceError::from(err)
        })
    }

    fn assigned_address(&self, student_id: StudentId) -> ServiceResult<Address> {
        let student = self.find_student_by_id(student_id)?;
        let address_id = student
            .address_id
            .ok_or(ServiceError::AddressNotAssigned(student_id))?;
        self.find_address_by_id(address_id)
    }

    fn load_courses(&self, student: &Student) -> ServiceResult<Vec<Course>> {
        student
            .course_ids
            .iter()
            .map(|course_id| self.enrolled_course(*course_id))
            .collect()
    }

    fn enrolled_course(&self, course_id: CourseId) -> ServiceResult<Course> {
        self.repo
            .find_course_by_id(course_id)?
            .ok_or(ServiceError::InconsistentState(
                "student membership references a missing course",
            ))
    }

    fn resolve(&self, student: Student) -> ServiceResult<ResolvedStudent> {
        let courses = self.load_courses(&student)?;
        let address = match student.address_id {
            Some(address_id) => self.repo.find_address_by_id(address_id)?,
            None => None,
        };
        Ok(ResolvedStudent {
            student,
            courses,
            address,
        })
    }

    fn map_student(&self, student: Student) -> ServiceResult<StudentWithCoursesRecord> {
        let resolved = self.resolve(student)?;
        Ok(StudentWithCoursesMapper::new(&self.courses).to_record(&resolved)?)
    }

    fn map_students(&self, students: Vec<Student>) -> ServiceResult<Vec<StudentWithCoursesRecord>> {
        let resolved = students
            .into_iter()
            .map(|student| self.resolve(student))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(StudentWithCoursesMapper::new(&self.courses).to_records(&resolved)?)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
