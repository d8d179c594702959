//! Repository layer for school records.
//!
//! # Responsibility
//! - Define per-entity data access contracts (find, save, delete, queries).
//! - Keep SQL details out of services and the mapping layer.
//!
//! # Invariants
//! - Repositories report absent rows as `RepoError::NotFound` on writes and
//!   as `Ok(None)` on single-row reads.
//! - Multi-statement writes (row + enrollment rows) are only atomic when the
//!   caller runs them inside `TransactionScope::in_transaction`.

pub mod address_repo;
pub mod course_repo;
pub mod store;
pub mod student_repo;

pub use address_repo::AddressRepository;
pub use course_repo::CourseRepository;
pub use store::{RepoError, RepoResult, SchoolRepository, SqliteSchoolRepository, TransactionScope};
pub use student_repo::{GenderCount, StudentRepository};
