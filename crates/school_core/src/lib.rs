//! Core domain logic for the school records backend.
//! This crate owns the entity graph, relationship maintenance, the mapping
//! layer and the use-case services; transport layers sit on top of it.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{EmptyListPolicy, EnrollmentCountPolicy, LoggingConfig, SchoolConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapper::{
    AddressRecord, CourseLookup, CourseMapper, CourseRecord, ResolvedStudent, StudentRecord,
    StudentWithCoursesMapper, StudentWithCoursesRecord,
};
pub use model::address::{Address, AddressId};
pub use model::course::{Course, CourseId, InstructorId};
pub use model::enrollment::{enroll, withdraw, RelationshipError};
pub use model::student::{
    Gender, Student, StudentId, StudentValidationError, MAX_STUDENT_AGE, MIN_STUDENT_AGE,
};
pub use model::EntityKind;
pub use repo::{
    AddressRepository, CourseRepository, GenderCount, RepoError, RepoResult, SchoolRepository,
    SqliteSchoolRepository, StudentRepository, TransactionScope,
};
pub use service::address_service::AddressService;
pub use service::course_service::CourseService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
