//! Translation between persisted entities and caller-facing records.
//!
//! # Responsibility
//! - Copy plain fields in both directions.
//! - Compute course-derived fields (`numberOfStudents`, `instructorId`) at
//!   translation time through a `CourseLookup`.
//!
//! # Invariants
//! - Mapping is pure over its resolved inputs; the only side channel is the
//!   course lookup.
//! - Record -> entity never populates relationship fields; services attach
//!   those.
//! - List mapping preserves input order and maps empty input to empty output.

pub mod address;
pub mod course;
pub mod record;
pub mod student;

pub use address::{address_to_record, addresses_to_records, record_to_address};
pub use course::{record_to_course, records_to_courses, CourseLookup, CourseMapper};
pub use record::{AddressRecord, CourseRecord, StudentRecord, StudentWithCoursesRecord};
pub use student::{
    record_to_student, student_to_record, students_to_records, ResolvedStudent,
    StudentWithCoursesMapper,
};
