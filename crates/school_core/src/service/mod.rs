//! Use-case services for school records.
//!
//! # Responsibility
//! - Orchestrate repositories, relationship maintenance and mapping per use
//!   case.
//! - Enforce the student age rule and id existence before any write.
//!
//! # Invariants
//! - Every mutating operation runs inside exactly one transaction.
//! - Callers only ever see records, never entities, except through the
//!   explicit `find_*_by_id` helpers.

pub mod address_service;
pub mod course_service;
pub mod error;
pub mod student_service;
